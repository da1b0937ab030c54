use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::utils::format_timestamp;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceStatus {
    Running,
    Warning,
    Stopped,
}

impl ServiceStatus {
    pub fn label(&self) -> &'static str {
        match self {
            ServiceStatus::Running => "running",
            ServiceStatus::Warning => "warning",
            ServiceStatus::Stopped => "stopped",
        }
    }

    /// Tabler ikona pro stav služby
    pub fn icon(&self) -> &'static str {
        match self {
            ServiceStatus::Running => "ti-check",
            ServiceStatus::Warning => "ti-alert-triangle",
            ServiceStatus::Stopped => "ti-circle-x",
        }
    }

    /// Barva ikony (green, yellow, red)
    pub fn color(&self) -> &'static str {
        match self {
            ServiceStatus::Running => "green",
            ServiceStatus::Warning => "yellow",
            ServiceStatus::Stopped => "red",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceDescriptor {
    pub name: String,
    pub status: ServiceStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub last_updated: DateTime<Utc>,
}

impl ServiceDescriptor {
    pub fn new(name: &str, url: Option<&str>, now: DateTime<Utc>) -> Self {
        Self {
            name: name.to_string(),
            status: ServiceStatus::Running,
            url: url.map(|u| u.to_string()),
            last_updated: now,
        }
    }

    pub fn last_updated_formatted(&self) -> String {
        format_timestamp(&self.last_updated)
    }
}

/// Pevný seznam sledovaných služeb, každý start začíná od něj
pub fn default_services(now: DateTime<Utc>) -> Vec<ServiceDescriptor> {
    vec![
        ServiceDescriptor::new("Nginx", Some("https://isp-pybox.gvec.net"), now),
        ServiceDescriptor::new("Docker", None, now),
        ServiceDescriptor::new(
            "Prometheus",
            Some("https://prometheus.isp-pybox.gvec.net"),
            now,
        ),
        ServiceDescriptor::new(
            "Grafana",
            Some("https://grafana.isp-pybox.gvec.net"),
            now,
        ),
    ]
}
