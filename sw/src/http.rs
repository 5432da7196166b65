use web_sys::{RequestMode, ResponseType};

use crate::error::SwError;

pub trait RequestLike {
    fn url(&self) -> String;
    fn method(&self) -> String;
    /// Top-level document load (`mode: "navigate"`).
    fn is_navigation(&self) -> bool;
}

pub trait ResponseLike: Sized {
    fn status(&self) -> u16;
    /// `type: "basic"`, i.e. same-origin and readable.
    fn is_same_origin(&self) -> bool;
    /// A second, independently consumable copy of the body.
    fn duplicate(&self) -> Result<Self, SwError>;
}

impl RequestLike for web_sys::Request {
    fn url(&self) -> String {
        web_sys::Request::url(self)
    }

    fn method(&self) -> String {
        web_sys::Request::method(self)
    }

    fn is_navigation(&self) -> bool {
        self.mode() == RequestMode::Navigate
    }
}

impl ResponseLike for web_sys::Response {
    fn status(&self) -> u16 {
        web_sys::Response::status(self)
    }

    fn is_same_origin(&self) -> bool {
        self.type_() == ResponseType::Basic
    }

    fn duplicate(&self) -> Result<Self, SwError> {
        web_sys::Response::clone(self).map_err(SwError::from_js_value)
    }
}

/// Only complete, same-origin `GET` responses go into the cache; the Cache API
/// rejects other methods and opaque or partial bodies would poison later hits.
pub fn is_cacheable<Q: RequestLike, R: ResponseLike>(request: &Q, response: &R) -> bool {
    request.method() == "GET" && response.status() == 200 && response.is_same_origin()
}
