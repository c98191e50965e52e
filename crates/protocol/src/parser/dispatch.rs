//! Success and error listeners of a parse session.

use std::fmt;
use std::mem;

use crate::protocol::{ParseError, Request};

type SuccessListener<'l> = Box<dyn FnMut(&Request) + 'l>;
type ErrorListener<'l> = Box<dyn FnMut(&[ParseError]) + 'l>;

/// Holds the listeners of one session and fires them in registration order.
///
/// Firing drains both slots, so whichever outcome comes first is the only one ever
/// delivered. A panicking listener is not caught.
#[derive(Default)]
pub struct Dispatcher<'l> {
    success: Vec<SuccessListener<'l>>,
    error: Vec<ErrorListener<'l>>,
}

impl<'l> Dispatcher<'l> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_success<F>(&mut self, listener: F)
    where
        F: FnMut(&Request) + 'l,
    {
        self.success.push(Box::new(listener));
    }

    pub fn on_error<F>(&mut self, listener: F)
    where
        F: FnMut(&[ParseError]) + 'l,
    {
        self.error.push(Box::new(listener));
    }

    /// Returns true if no outcome has been dispatched and at least one listener is registered
    pub fn has_listeners(&self) -> bool {
        !self.success.is_empty() || !self.error.is_empty()
    }

    pub(crate) fn dispatch_success(&mut self, request: &Request) {
        self.error.clear();
        for listener in &mut mem::take(&mut self.success) {
            listener(request);
        }
    }

    pub(crate) fn dispatch_error(&mut self, errors: &[ParseError]) {
        self.success.clear();
        for listener in &mut mem::take(&mut self.error) {
            listener(errors);
        }
    }
}

impl fmt::Debug for Dispatcher<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("success", &self.success.len())
            .field("error", &self.error.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::Method;
    use std::cell::RefCell;

    #[test]
    fn listeners_fire_in_registration_order_once() {
        let calls = RefCell::new(Vec::new());
        let mut dispatcher = Dispatcher::new();
        dispatcher.on_success(|_| calls.borrow_mut().push("first"));
        dispatcher.on_success(|_| calls.borrow_mut().push("second"));
        dispatcher.on_error(|_| calls.borrow_mut().push("error"));
        assert!(dispatcher.has_listeners());

        let request = Request::new(Method::Sync, "a", Vec::new(), &b""[..]);
        dispatcher.dispatch_success(&request);
        dispatcher.dispatch_success(&request);
        dispatcher.dispatch_error(&[ParseError::unknown_method()]);

        assert_eq!(*calls.borrow(), ["first", "second"]);
        assert!(!dispatcher.has_listeners());
    }

    #[test]
    fn error_listeners_receive_all_errors() {
        let received = RefCell::new(Vec::new());
        let mut dispatcher = Dispatcher::new();
        dispatcher.on_error(|errors| received.borrow_mut().extend_from_slice(errors));

        dispatcher.dispatch_error(&[ParseError::unknown_method(), ParseError::header_colon()]);

        assert_eq!(received.borrow().len(), 2);
        assert_eq!(received.borrow()[1], ParseError::header_colon());
    }
}
