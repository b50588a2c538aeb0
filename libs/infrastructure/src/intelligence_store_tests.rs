//! # Intelligence Store Tests — 学習台帳の不変条件
//!
//! ファイルベース一時 SQLite を使った `SqliteIntelligenceStore` のテストスイート。
//! 信頼度クランプとユニークキー upsert を機械的に保証する。

#[cfg(test)]
mod tests {
    use crate::db;
    use crate::intelligence_store::SqliteIntelligenceStore;
    use foundry_core::traits::IntelligenceStore;

    /// テスト用のユニーク一時ファイルストアを作成
    /// 各テストが独自のDBファイルを持ち、ロック競合を回避する
    async fn create_test_store() -> (SqliteIntelligenceStore, tempfile::TempDir) {
        let tmp_dir = tempfile::TempDir::new().expect("Failed to create temp dir");
        let db_path = tmp_dir.path().join("test.db");
        let db_path_str = db_path.to_str().expect("Invalid path");
        let pool = db::connect(db_path_str).await.expect("Failed to open test db");
        let store = SqliteIntelligenceStore::new(pool, 0.1);
        (store, tmp_dir) // tmp_dir must be kept alive for the DB file to exist
    }

    // ===== 1. Find-or-Create =====

    #[tokio::test]
    async fn test_upsert_creates_new_pattern() {
        let (store, _tmp) = create_test_store().await;

        store
            .upsert_pattern("brand-a", "camera_type", "lateral tracking", 0.5, 0.1, 1)
            .await
            .unwrap();

        let rows = store.fetch_patterns("brand-a", 0.0, 10).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].pattern_type, "camera_type");
        assert_eq!(rows[0].pattern_value, "lateral tracking");
        assert!((rows[0].confidence - 0.5).abs() < 1e-9);
        assert_eq!(rows[0].occurrences, 1);
        assert!(!rows[0].last_seen.is_empty());
    }

    #[tokio::test]
    async fn test_upsert_same_key_twice_yields_one_row() {
        let (store, _tmp) = create_test_store().await;

        store
            .upsert_pattern("brand-a", "lighting", "golden hour", 0.5, 0.1, 1)
            .await
            .unwrap();
        store
            .upsert_pattern("brand-a", "lighting", "golden hour", 0.5, 0.1, 1)
            .await
            .unwrap();

        let rows = store.fetch_patterns("brand-a", 0.0, 10).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].occurrences, 2);
        assert!((rows[0].confidence - 0.6).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_upsert_occurrence_step_is_applied() {
        let (store, _tmp) = create_test_store().await;

        store
            .upsert_pattern("brand-a", "fps_preference", "24", 0.6, 0.0, 1)
            .await
            .unwrap();
        store
            .upsert_pattern("brand-a", "fps_preference", "24", 0.6, 0.0, 3)
            .await
            .unwrap();

        let rows = store.fetch_patterns("brand-a", 0.0, 10).await.unwrap();
        assert_eq!(rows[0].occurrences, 4);
        assert!((rows[0].confidence - 0.6).abs() < 1e-9);
    }

    // ===== 2. Confidence Clamping =====

    #[tokio::test]
    async fn test_confidence_caps_at_one() {
        let (store, _tmp) = create_test_store().await;

        store
            .upsert_pattern("brand-a", "platform_preference", "veo3", 0.5, 0.1, 1)
            .await
            .unwrap();
        for _ in 0..10 {
            store
                .upsert_pattern("brand-a", "platform_preference", "veo3", 0.5, 0.1, 1)
                .await
                .unwrap();
        }

        let rows = store.fetch_patterns("brand-a", 0.0, 10).await.unwrap();
        assert!((rows[0].confidence - 1.0).abs() < 1e-9);
        assert_eq!(rows[0].occurrences, 11);
    }

    #[tokio::test]
    async fn test_confidence_floors_at_configured_minimum() {
        let (store, _tmp) = create_test_store().await;

        store
            .upsert_pattern("brand-a", "platform_preference", "sora", 0.5, 0.1, 1)
            .await
            .unwrap();
        for _ in 0..10 {
            store
                .upsert_pattern("brand-a", "platform_preference", "sora", 0.5, -0.15, 1)
                .await
                .unwrap();
        }

        let rows = store.fetch_patterns("brand-a", 0.0, 10).await.unwrap();
        assert!((rows[0].confidence - 0.1).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_start_confidence_is_clamped_on_create() {
        let (store, _tmp) = create_test_store().await;

        store
            .upsert_pattern("brand-a", "motion_style", "drifting", 1.7, 0.0, 1)
            .await
            .unwrap();
        store
            .upsert_pattern("brand-a", "motion_style", "cruising", 0.0, 0.0, 1)
            .await
            .unwrap();

        let rows = store.fetch_patterns("brand-a", 0.0, 10).await.unwrap();
        let drifting = rows.iter().find(|r| r.pattern_value == "drifting").unwrap();
        let cruising = rows.iter().find(|r| r.pattern_value == "cruising").unwrap();
        assert!((drifting.confidence - 1.0).abs() < 1e-9);
        assert!((cruising.confidence - 0.1).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_alternating_feedback_stays_in_bounds() {
        let (store, _tmp) = create_test_store().await;

        for i in 0..20 {
            let delta = if i % 2 == 0 { 0.1 } else { -0.15 };
            store
                .upsert_pattern("brand-a", "platform_preference", "kling", 0.5, delta, 1)
                .await
                .unwrap();
        }

        let rows = store.fetch_patterns("brand-a", 0.0, 10).await.unwrap();
        assert!(rows[0].confidence >= 0.1);
        assert!(rows[0].confidence <= 1.0);
    }

    // ===== 3. Fetch Semantics =====

    #[tokio::test]
    async fn test_fetch_filters_by_min_confidence_and_orders_descending() {
        let (store, _tmp) = create_test_store().await;

        store
            .upsert_pattern("brand-a", "camera_type", "detail", 0.3, 0.0, 1)
            .await
            .unwrap();
        store
            .upsert_pattern("brand-a", "camera_type", "interior", 0.9, 0.0, 1)
            .await
            .unwrap();
        store
            .upsert_pattern("brand-a", "camera_type", "aerial", 0.6, 0.0, 1)
            .await
            .unwrap();

        let rows = store.fetch_patterns("brand-a", 0.5, 10).await.unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].pattern_value, "interior");
        assert_eq!(rows[1].pattern_value, "aerial");
    }

    #[tokio::test]
    async fn test_fetch_respects_limit() {
        let (store, _tmp) = create_test_store().await;

        for i in 0..5 {
            store
                .upsert_pattern("brand-a", "lighting", &format!("value-{}", i), 0.8, 0.0, 1)
                .await
                .unwrap();
        }

        let rows = store.fetch_patterns("brand-a", 0.0, 3).await.unwrap();
        assert_eq!(rows.len(), 3);
    }

    #[tokio::test]
    async fn test_patterns_never_cross_tenants() {
        let (store, _tmp) = create_test_store().await;

        store
            .upsert_pattern("brand-a", "camera_type", "lateral tracking", 0.9, 0.0, 1)
            .await
            .unwrap();
        store
            .upsert_pattern("brand-b", "camera_type", "follow behind", 0.9, 0.0, 1)
            .await
            .unwrap();

        let rows_a = store.fetch_patterns("brand-a", 0.0, 10).await.unwrap();
        let rows_b = store.fetch_patterns("brand-b", 0.0, 10).await.unwrap();
        assert_eq!(rows_a.len(), 1);
        assert_eq!(rows_a[0].pattern_value, "lateral tracking");
        assert_eq!(rows_b.len(), 1);
        assert_eq!(rows_b[0].pattern_value, "follow behind");
    }
}
