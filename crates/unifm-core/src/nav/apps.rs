//! Android apps that can pick files, listed below the volumes.

use serde::{Deserialize, Serialize};

/// An Android app registered by the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AndroidApp {
    pub name: String,
    pub package_name: String,
    pub activity_name: String,
    #[serde(default)]
    pub icon: Option<String>,
}

impl AndroidApp {
    /// Navigation key of the app. Apps are not entries, so this key never
    /// names a cache record.
    pub fn key(&self) -> String {
        format!("android-app://{}/{}", self.package_name, self.activity_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_combines_package_and_activity() {
        let app = AndroidApp {
            name: "Photos".into(),
            package_name: "com.example.photos".into(),
            activity_name: "PickActivity".into(),
            icon: None,
        };
        assert_eq!(app.key(), "android-app://com.example.photos/PickActivity");
    }
}
