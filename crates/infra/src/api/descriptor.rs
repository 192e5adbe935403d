//! Request descriptors
//!
//! A descriptor is a repeatable recipe for one HTTP call. It is invoked once
//! per attempt with whatever transport is current at that moment, so a
//! replay after a token refresh picks up the new credentials without
//! re-deriving its parameters.

use reqwest::RequestBuilder;

use crate::http::ApiTransport;

/// Repeatable factory for one HTTP call
pub trait RequestDescriptor: Send + Sync {
    fn build(&self, transport: &ApiTransport) -> RequestBuilder;
}

impl<F> RequestDescriptor for F
where
    F: Fn(&ApiTransport) -> RequestBuilder + Send + Sync,
{
    fn build(&self, transport: &ApiTransport) -> RequestBuilder {
        self(transport)
    }
}
