use serde::{Deserialize, Serialize};
use std::time::Instant;
use sysinfo::{Pid, System};

/// プロセスの稼働状況
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthReport {
    pub status: String,
    pub uptime_secs: u64,
    pub memory_usage_mb: u64,
    pub cpu_usage_percent: f32,
}

/// 自プロセスのリソース使用状況を監視する
pub struct HealthMonitor {
    sys: System,
    pid: Pid,
    started: Instant,
}

impl HealthMonitor {
    pub fn new() -> Self {
        let mut sys = System::new_all();
        sys.refresh_all();
        let pid = Pid::from(std::process::id() as usize);
        Self {
            sys,
            pid,
            started: Instant::now(),
        }
    }

    pub fn check(&mut self) -> HealthReport {
        // 自プロセスのみリフレッシュ
        self.sys.refresh_process(self.pid);

        let mut memory_usage_mb = 0;
        let mut cpu_usage_percent = 0.0;

        if let Some(process) = self.sys.process(self.pid) {
            // sysinfo 0.30 では bytes 単位
            memory_usage_mb = process.memory() / 1024 / 1024;
            cpu_usage_percent = process.cpu_usage();
        }

        HealthReport {
            status: "ok".to_string(),
            uptime_secs: self.started.elapsed().as_secs(),
            memory_usage_mb,
            cpu_usage_percent,
        }
    }
}

impl Default for HealthMonitor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_reports_own_process() {
        let mut monitor = HealthMonitor::new();
        let report = monitor.check();
        assert_eq!(report.status, "ok");
        // 自プロセスは必ず存在するのでメモリは 0 より大きい
        assert!(report.memory_usage_mb > 0);
    }
}
