//! The closed set of operations offered by the string service.

use std::fmt;

/// One of the three string service operations.
///
/// Each variant knows how it is named on every surface: metric and log labels,
/// RPC method names and HTTP routes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    TitleCase,
    RemoveWhitespace,
    Count,
}

impl Method {
    /// All methods, in declaration order.
    pub const ALL: [Method; 3] = [Method::TitleCase, Method::RemoveWhitespace, Method::Count];

    /// Label used in log records and metric labels.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::TitleCase => "title_case",
            Self::RemoveWhitespace => "remove_whitespace",
            Self::Count => "count",
        }
    }

    /// Method name on the RPC transport.
    #[must_use]
    pub fn rpc_name(self) -> &'static str {
        match self {
            Self::TitleCase => "TitleCase",
            Self::RemoveWhitespace => "RemoveWhitespace",
            Self::Count => "Count",
        }
    }

    /// Route on the HTTP transport.
    #[must_use]
    pub fn http_route(self) -> &'static str {
        match self {
            Self::TitleCase => "/tc",
            Self::RemoveWhitespace => "/rw",
            Self::Count => "/c",
        }
    }

    /// Looks up a method by its RPC name.
    #[must_use]
    pub fn from_rpc_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.rpc_name() == name)
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
