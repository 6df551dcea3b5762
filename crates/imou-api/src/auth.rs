use std::fmt;
use std::str::FromStr;

use secrecy::{ExposeSecret, SecretString};
use url::Url;

use crate::error::Error;

/// Regional data center hosting the Imou open API.
///
/// Accounts are bound to the region they were registered in; calls against
/// the wrong region fail with a vendor error rather than a transport one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DataCenter {
    /// Asia-Pacific -- `openapi-sg.easy4ip.com`.
    #[default]
    Singapore,
    /// Americas -- `openapi-or.easy4ip.com`.
    Oregon,
    /// Europe -- `openapi-fk.easy4ip.com`.
    Frankfurt,
    /// Mainland China -- `openapi.lechange.cn`.
    China,
    /// Any other endpoint (proxies, test servers).
    Custom(Url),
}

impl DataCenter {
    /// The base URL all operation paths are appended to.
    ///
    /// Always ends with `/openapi/` for the named regions; custom URLs are
    /// normalized to end with a slash so `Url::join` keeps the full path.
    pub fn base_url(&self) -> Url {
        let raw = match self {
            Self::Singapore => "https://openapi-sg.easy4ip.com:443/openapi/",
            Self::Oregon => "https://openapi-or.easy4ip.com:443/openapi/",
            Self::Frankfurt => "https://openapi-fk.easy4ip.com:443/openapi/",
            Self::China => "https://openapi.lechange.cn:443/openapi/",
            Self::Custom(url) => return with_trailing_slash(url),
        };
        Url::parse(raw).expect("invalid data center URL")
    }

    /// Short name used in config files and on the command line.
    pub fn short_name(&self) -> &str {
        match self {
            Self::Singapore => "sg",
            Self::Oregon => "or",
            Self::Frankfurt => "fk",
            Self::China => "cn",
            Self::Custom(url) => url.as_str(),
        }
    }
}

impl fmt::Display for DataCenter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.short_name())
    }
}

impl FromStr for DataCenter {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sg" | "singapore" | "asia" => Ok(Self::Singapore),
            "or" | "oregon" | "us" | "america" => Ok(Self::Oregon),
            "fk" | "frankfurt" | "eu" | "europe" => Ok(Self::Frankfurt),
            "cn" | "china" => Ok(Self::China),
            _ => Ok(Self::Custom(Url::parse(s.trim())?)),
        }
    }
}

fn with_trailing_slash(url: &Url) -> Url {
    if url.path().ends_with('/') {
        return url.clone();
    }
    let mut url = url.clone();
    let path = format!("{}/", url.path());
    url.set_path(&path);
    url
}

/// Account credentials issued by the Imou developer console.
///
/// Immutable for the lifetime of a configured account. The client holds
/// them behind an `Arc` and never copies the secret out.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub app_id: String,
    pub app_secret: SecretString,
    pub data_center: DataCenter,
}

impl Credentials {
    pub fn new(app_id: impl Into<String>, app_secret: SecretString, data_center: DataCenter) -> Self {
        Self {
            app_id: app_id.into(),
            app_secret,
            data_center,
        }
    }

    /// Both the application id and secret are present.
    ///
    /// Incomplete credentials make every call fail with
    /// [`Error::NotReady`] before touching the network.
    pub fn is_complete(&self) -> bool {
        !self.app_id.trim().is_empty() && !self.app_secret.expose_secret().trim().is_empty()
    }
}
