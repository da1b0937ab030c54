use std::path::PathBuf;
use std::time::Duration;

/// Výchozí cesta k update skriptu
pub const DEFAULT_SCRIPT_PATH: &str = "/home/project/scripts/update-system.sh";

/// Výchozí program pro zvýšení oprávnění
pub const DEFAULT_ELEVATE_WITH: &str = "sudo";

/// Nastavení update služby (sestavené z CLI argumentů)
#[derive(Debug, Clone)]
pub struct UpdateSettings {
    pub script: PathBuf,
    /// Program, kterým se skript spouští (např. `sudo`), `None` = přímo
    pub elevate_with: Option<String>,
    pub timeout: Option<Duration>,
}

impl Default for UpdateSettings {
    fn default() -> Self {
        Self {
            script: PathBuf::from(DEFAULT_SCRIPT_PATH),
            elevate_with: Some(DEFAULT_ELEVATE_WITH.to_string()),
            timeout: None,
        }
    }
}

impl UpdateSettings {
    pub fn new(
        script: PathBuf,
        elevate_with: String,
        no_elevate: bool,
        timeout_secs: Option<u64>,
    ) -> Self {
        let elevate_with = elevate_with.trim().to_string();
        let elevate_with = if no_elevate || elevate_with.is_empty() {
            None
        } else {
            Some(elevate_with)
        };

        Self {
            script,
            elevate_with,
            timeout: timeout_secs.filter(|s| *s > 0).map(Duration::from_secs),
        }
    }

    /// Sestaví příkazovou řádku pro `sh -c`
    pub fn command_line(&self) -> String {
        let script = shell_quote(&self.script.to_string_lossy());
        match &self.elevate_with {
            Some(program) => format!("{} {}", program, script),
            None => script,
        }
    }

    /// Zaloguje varování ke konfiguraci (cesta ke skriptu se dál nevaliduje)
    pub fn log_warnings(&self) {
        if !self.script.exists() {
            tracing::warn!(
                "Update script {} does not exist, updates will fail",
                self.script.display()
            );
        }

        if let Some(program) = &self.elevate_with {
            tracing::warn!(
                "Update script runs with elevated privileges via '{}'",
                program
            );
        }

        if self.timeout.is_none() {
            tracing::info!("No update timeout configured, a hung script blocks its request");
        }
    }
}

/// Obalí hodnotu do apostrofů pro POSIX shell
fn shell_quote(value: &str) -> String {
    if !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "/._-+:=".contains(c))
    {
        return value.to_string();
    }

    format!("'{}'", value.replace('\'', r"'\''"))
}
