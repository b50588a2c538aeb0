//! # Prompt Foundry — プロンプト合成サービス
//!
//! ブランド別の学習状態を使って動画/静止画生成プロンプトを合成する。
//! HTTP サーバーモードと単発 CLI モードの両方を提供する。

use clap::Parser;
use foundry_core::contracts::{BrandProfile, GenerationRequest, OutputKind};
use foundry_core::traits::{BrandStore, IntelligenceStore, PromptLedger};
use infrastructure::brand_store::SqliteBrandStore;
use infrastructure::completion::AnthropicCompletion;
use infrastructure::intelligence_store::SqliteIntelligenceStore;
use infrastructure::prompt_ledger::SqlitePromptLedger;
use shared::config::FoundryConfig;
use shared::health::HealthMonitor;
use std::sync::Arc;
use tokio::signal;
use tokio::sync::Mutex;
use tracing::{error, info, warn};
use tuning::TuningCatalog;

mod feedback;
mod server;
mod synthesizer;

use feedback::FeedbackLearner;
use server::router::{create_router, AppState};
use synthesizer::{PromptSynthesizer, SynthesisLimits};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// HTTP API サーバーモード
    Serve {
        #[arg(short, long, default_value = "8080")]
        port: u16,
    },
    /// 単発のプロンプト合成
    Generate {
        /// 対象ブランドID
        #[arg(short, long)]
        brand: String,

        /// ショットの記述文
        #[arg(short, long)]
        description: String,

        /// 生成プラットフォーム
        #[arg(short, long, default_value = "veo3")]
        platform: String,

        /// 出力種別 (video / still)
        #[arg(short, long, default_value = "video")]
        output: String,

        /// 尺 (秒)
        #[arg(long)]
        duration: Option<u32>,

        /// ショットタイプ
        #[arg(long)]
        shot: Option<String>,

        /// 画面内の進行方向
        #[arg(long)]
        direction: Option<String>,

        /// セッションID (繋がりのあるショット群に付与)
        #[arg(long)]
        session: Option<String>,

        /// 所有者ID (指定時は所有権を検査)
        #[arg(long)]
        owner: Option<String>,
    },
    /// 補完を呼ばずにプラットフォーム予測だけを行う
    Predict {
        /// ショットの記述文
        #[arg(short, long)]
        description: String,

        /// 優先したいプラットフォーム
        #[arg(short, long)]
        platform: Option<String>,

        /// 出力種別 (video / still)
        #[arg(short, long, default_value = "video")]
        output: String,

        /// 尺 (秒)
        #[arg(long)]
        duration: Option<u32>,

        /// ショットタイプ
        #[arg(long)]
        shot: Option<String>,
    },
    /// ブランドプロファイルの登録・更新
    SeedBrand {
        #[arg(long)]
        brand: String,

        #[arg(long)]
        owner: String,

        #[arg(long)]
        name: String,

        #[arg(long)]
        description: Option<String>,

        #[arg(long)]
        industry: Option<String>,

        /// トーンキーワード (カンマ区切り)
        #[arg(long, value_delimiter = ',')]
        tone: Vec<String>,

        /// ビジュアルルール (カンマ区切り)
        #[arg(long, value_delimiter = ',')]
        rules: Vec<String>,
    },
}

fn parse_output(raw: &str) -> OutputKind {
    if raw.eq_ignore_ascii_case("still") {
        OutputKind::Still
    } else {
        OutputKind::Video
    }
}

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .init();
    dotenvy::dotenv().ok();

    let args = Args::parse();

    // 1. 設定を読み込む
    let config = FoundryConfig::load().unwrap_or_else(|e| {
        warn!("⚠️ 設定の読み込みに失敗、既定値で継続: {}", e);
        FoundryConfig::default()
    });

    tracing::info!("⚙️  Config loaded:");
    tracing::info!("   Database: {}", config.database_path);
    tracing::info!("   Model:    {}", config.model_name);
    tracing::info!(
        "   Catalog:  {}",
        if config.catalog_path.is_empty() {
            "builtin"
        } else {
            config.catalog_path.as_str()
        }
    );

    // 2. 運用監視
    let health = Arc::new(Mutex::new(HealthMonitor::new()));
    let status = health.lock().await.check();
    tracing::info!(
        "📊 Initial Health Status: Memory {}MB, CPU {:.1}%",
        status.memory_usage_mb,
        status.cpu_usage_percent
    );

    // 3. チューニングカタログ
    let catalog = if config.catalog_path.is_empty() {
        TuningCatalog::builtin()
    } else {
        TuningCatalog::load_from_file(&config.catalog_path)?
    };

    // 4. 永続層の準備
    let db_path = std::path::Path::new(&config.database_path);
    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let pool = infrastructure::db::connect(&config.database_path).await?;
    let brand_store: Arc<dyn BrandStore> = Arc::new(SqliteBrandStore::new(pool.clone()));
    let intelligence: Arc<dyn IntelligenceStore> = Arc::new(SqliteIntelligenceStore::new(
        pool.clone(),
        config.confidence_floor,
    ));
    let ledger: Arc<dyn PromptLedger> = Arc::new(SqlitePromptLedger::new(pool.clone()));

    // 5. 補完エンジンとパイプライン
    let completion = Arc::new(AnthropicCompletion::new(
        &config.anthropic_api_key,
        &config.model_name,
        config.max_tokens as u64,
        config.temperature,
        config.completion_timeout_secs,
    ));
    let synthesizer = Arc::new(PromptSynthesizer::new(
        &catalog,
        brand_store.clone(),
        intelligence.clone(),
        ledger.clone(),
        completion,
        SynthesisLimits {
            history_limit: config.history_limit,
            intelligence_limit: config.intelligence_limit,
            min_surfaced_confidence: config.min_surfaced_confidence,
        },
    )?);
    let learner = Arc::new(FeedbackLearner::new(
        ledger,
        intelligence.clone(),
        catalog.vocabulary.clone(),
    ));

    // コマンド分岐
    match args.command.unwrap_or(Commands::Serve {
        port: config.server_port,
    }) {
        Commands::Serve { port } => {
            info!("📡 Starting Prompt Foundry Server on port {}", port);

            let state = Arc::new(AppState {
                synthesizer,
                learner,
                intelligence,
                health,
            });
            let app = create_router(state);
            let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?;
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    let _ = signal::ctrl_c().await;
                    info!("🛑 SIGINT received. Shutting down gracefully...");
                })
                .await?;
        }
        Commands::Generate {
            brand,
            description,
            platform,
            output,
            duration,
            shot,
            direction,
            session,
            owner,
        } => {
            let request = GenerationRequest {
                brand_id: brand,
                owner_id: owner,
                description,
                platform,
                output: parse_output(&output),
                duration_secs: duration,
                shot_type: shot,
                screen_direction: direction,
                session_id: session,
            };

            info!("🚀 Launching Synthesis Pipeline...");

            tokio::select! {
                res = synthesizer.synthesize(request) => {
                    match res {
                        Ok(outcome) => {
                            println!("\n🏆 プロンプト合成完了！");
                            println!("   🆔 ID:         {}", outcome.prompt_id);
                            println!("   🎯 Prediction: {} ({}%)", outcome.prediction.recommended_platform, outcome.prediction.confidence);
                            println!("   📋 Notes:      {}", outcome.technical_notes);
                            for warning in &outcome.warnings {
                                println!("   ⚠️  {}", warning);
                            }
                            if !outcome.suggestions.is_empty() {
                                println!("   💡 {}", outcome.suggestions.join(" / "));
                            }
                            println!("\n{}", outcome.prompt_text);
                        }
                        Err(e) => {
                            error!("❌ 合成パイプラインが失敗: {}", e);
                        }
                    }
                }
                _ = signal::ctrl_c() => {
                    tracing::info!("🛑 SIGINT received. Shutting down gracefully...");
                }
            }
        }
        Commands::Predict {
            description,
            platform,
            output,
            duration,
            shot,
        } => {
            match synthesizer.predict(
                &description,
                platform.as_deref(),
                parse_output(&output),
                duration,
                shot.as_deref(),
            ) {
                Ok(prediction) => {
                    println!("\n🎯 プラットフォーム予測");
                    println!(
                        "   🥇 {} ({}%)",
                        prediction.recommended_platform, prediction.confidence
                    );
                    println!("   💬 {}", prediction.rationale);
                    for alt in &prediction.alternatives {
                        println!("   🥈 {} ({}): {}", alt.platform, alt.score, alt.note);
                    }
                    for warning in &prediction.warnings {
                        println!("   ⚠️  {}", warning);
                    }
                }
                Err(e) => {
                    error!("❌ 予測が失敗: {}", e);
                }
            }
        }
        Commands::SeedBrand {
            brand,
            owner,
            name,
            description,
            industry,
            tone,
            rules,
        } => {
            let profile = BrandProfile {
                brand_id: brand.clone(),
                owner_id: owner,
                brand_name: name,
                brand_description: description,
                industry,
                tone_keywords: tone,
                visual_rules: rules,
            };
            brand_store.upsert_profile(&profile).await?;
            println!("✅ ブランドプロファイルを登録: {}", brand);
        }
    }

    Ok(())
}
