//! HTTP method selectors used as route table keys.

use std::fmt;
use std::str::FromStr;

use axum::http::Method;

use crate::routing::error::RouteError;

/// The method half of a route table key.
///
/// `All` is the wildcard form: a binding declared with it runs for every
/// request method and matches sub-paths of its path as well.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MethodSpec {
    All,
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Head,
    Options,
}

impl MethodSpec {
    /// Returns true if a request with `method` is handled by this selector.
    ///
    /// HEAD requests are served by GET bindings.
    pub fn accepts(&self, method: &Method) -> bool {
        match self {
            MethodSpec::All => true,
            MethodSpec::Get => method == Method::GET || method == Method::HEAD,
            MethodSpec::Post => method == Method::POST,
            MethodSpec::Put => method == Method::PUT,
            MethodSpec::Patch => method == Method::PATCH,
            MethodSpec::Delete => method == Method::DELETE,
            MethodSpec::Head => method == Method::HEAD,
            MethodSpec::Options => method == Method::OPTIONS,
        }
    }

    pub fn is_wildcard(&self) -> bool {
        matches!(self, MethodSpec::All)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MethodSpec::All => "use",
            MethodSpec::Get => "get",
            MethodSpec::Post => "post",
            MethodSpec::Put => "put",
            MethodSpec::Patch => "patch",
            MethodSpec::Delete => "delete",
            MethodSpec::Head => "head",
            MethodSpec::Options => "options",
        }
    }
}

impl fmt::Display for MethodSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MethodSpec {
    type Err = RouteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "use" | "all" | "*" => Ok(MethodSpec::All),
            "get" => Ok(MethodSpec::Get),
            "post" => Ok(MethodSpec::Post),
            "put" => Ok(MethodSpec::Put),
            "patch" => Ok(MethodSpec::Patch),
            "delete" => Ok(MethodSpec::Delete),
            "head" => Ok(MethodSpec::Head),
            "options" => Ok(MethodSpec::Options),
            other => Err(RouteError::UnknownMethod(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_wildcard_aliases() {
        for s in ["use", "all", "*", "USE"] {
            assert_eq!(s.parse::<MethodSpec>().unwrap(), MethodSpec::All);
        }
        assert_eq!("Get".parse::<MethodSpec>().unwrap(), MethodSpec::Get);
        assert!("fetch".parse::<MethodSpec>().is_err());
    }

    #[test]
    fn test_accepts() {
        assert!(MethodSpec::All.accepts(&Method::DELETE));
        assert!(MethodSpec::Get.accepts(&Method::GET));
        assert!(MethodSpec::Get.accepts(&Method::HEAD));
        assert!(!MethodSpec::Get.accepts(&Method::POST));
        assert!(!MethodSpec::Head.accepts(&Method::GET));
    }
}
