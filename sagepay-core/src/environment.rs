//! Gateway environments and the endpoints they resolve to.

use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};
use url::Url;

use crate::errors::{Error, Result};

/// The SagePay environment a merchant account talks to.
///
/// Unrecognised names fail to parse; there is no default environment.
///
/// ```
/// use sagepay_core::environment::Environment;
///
/// assert_eq!("DEVELOPMENT".parse::<Environment>().unwrap(), Environment::Test);
/// assert_eq!("live".parse::<Environment>().unwrap(), Environment::Live);
/// assert!("staging".parse::<Environment>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// `test.sagepay.com`, no money moves.
    Test,
    /// `live.sagepay.com`.
    Live,
}

impl Environment {
    /// Host serving this environment.
    pub fn host(&self) -> &'static str {
        match self {
            Environment::Test => "test.sagepay.com",
            Environment::Live => "live.sagepay.com",
        }
    }

    /// Resolve the endpoint of `service` in this environment.
    pub fn endpoint(&self, service: Service) -> Result<Url> {
        let url = format!(
            "https://{}/gateway/service/{}",
            self.host(),
            service.path()
        );
        Ok(Url::parse(&url)?)
    }
}

impl FromStr for Environment {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "DEVELOPMENT" | "TEST" => Ok(Environment::Test),
            "LIVE" | "PRODUCTION" => Ok(Environment::Live),
            _ => Err(Error::UnknownEnvironment(s.to_string())),
        }
    }
}

impl Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Test => write!(f, "test"),
            Environment::Live => write!(f, "live"),
        }
    }
}

/// Gateway services used by the Direct integration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Service {
    /// Registers and authorises a card transaction.
    Register,
    /// Completes a transaction after the 3-D Secure challenge.
    Direct3DCallback,
}

impl Service {
    pub fn path(&self) -> &'static str {
        match self {
            Service::Register => "vspdirect-register.vsp",
            Service::Direct3DCallback => "direct3dcallback.vsp",
        }
    }
}
