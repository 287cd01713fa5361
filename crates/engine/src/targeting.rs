//! # Targeting
//!
//! Two ways of answering target cursors:
//!
//! - A continuation slot. [`Engine::request_target`] shows the user a
//!   cursor of our own and hands the picked object to a callback. At most
//!   one callback waits at a time; a new request, or a cursor from the
//!   server, resolves the waiting one with `None` first.
//! - A queue of pre-answered targets. Commands such as `waittargetself`
//!   push serials, and the next cursors the server sends are answered from
//!   the queue without the client ever seeing them.
//!
//! When the server's cursor is already up on the client and we need our
//! own, the server's cursor is cancelled on the server side first, using
//! a copy of its request kept for that purpose.

use crate::engine::Engine;
use bytes::BytesMut;
use std::collections::VecDeque;
use uoinject_core::Serial;
use uoinject_protocol::{build_target_reply, build_target_request, TargetPacket, INVALID_XY};

/// Callback receiving the object the user picked, `None` when cancelled
///
/// A `Some` serial always names an object present in the world.
pub type TargetContinuation = Box<dyn FnOnce(&mut Engine, Option<Serial>)>;

/// Targeting state of a session
#[derive(Default)]
pub struct Targeting {
    /// Waiting for the client to answer our cursor
    pending: Option<TargetContinuation>,
    /// The client shows a cursor the server asked for
    client_targeting: bool,
    /// Cancel form of the server's last cursor
    cancel_request: Option<TargetPacket>,
    /// Answers for the next server cursors
    queue: VecDeque<Serial>,
    pub(crate) last_target: Option<Serial>,
}

impl Targeting {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a continuation is waiting
    pub fn is_awaiting(&self) -> bool {
        self.pending.is_some()
    }

    pub fn client_targeting(&self) -> bool {
        self.client_targeting
    }

    /// Number of queued answers
    pub fn queued(&self) -> usize {
        self.queue.len()
    }
}

impl Engine {
    /// Show the user a target cursor and call `continuation` with the result
    ///
    /// # Purpose
    /// A continuation already waiting is resolved with `None` before the
    /// new cursor is sent, so no request is ever dropped silently.
    ///
    /// # Returns
    /// `false` if there is no session to target in
    pub fn request_target<F>(&mut self, continuation: F) -> bool
    where
        F: FnOnce(&mut Engine, Option<Serial>) + 'static,
    {
        if self.session.is_none() {
            tracing::debug!("Target requested outside a session");
            return false;
        }
        self.cancel_pending_target();
        if let Some(session) = self.session.as_mut() {
            session.targeting.pending = Some(Box::new(continuation));
        }
        self.send_target_request();
        true
    }

    /// Resolve every waiting continuation with `None`
    fn cancel_pending_target(&mut self) {
        // A continuation may itself request a new target
        while self.session.as_ref().map_or(false, |s| s.targeting.is_awaiting()) {
            self.got_target(None);
        }
    }

    fn got_target(&mut self, target: Option<Serial>) {
        let continuation = self.session.as_mut().and_then(|s| s.targeting.pending.take());
        match continuation {
            Some(continuation) => continuation(self, target),
            None => tracing::error!("Target delivered with no continuation waiting"),
        }
    }

    fn send_target_request(&mut self) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        let player = session.player();
        let targeting = &mut session.targeting;
        let cancel = if targeting.client_targeting {
            targeting.client_targeting = false;
            targeting.cancel_request.take()
        } else {
            None
        };

        if let Some(cancel) = cancel {
            tracing::debug!("Cancelling the server's target cursor");
            self.send_server(&cancel.to_bytes());
        }
        let mut buf = BytesMut::new();
        build_target_request(&mut buf, player);
        self.send_client(&buf);
    }

    /// Answer the next server target cursor with `serial`, 0 cancels it
    pub fn wait_target(&mut self, serial: Serial) {
        if let Some(session) = self.session.as_mut() {
            tracing::debug!("Queued target {}", serial);
            session.targeting.queue.push_back(serial);
        }
    }

    /// Answer the next two server target cursors
    pub fn wait_target2(&mut self, first: Serial, second: Serial) {
        self.wait_target(first);
        self.wait_target(second);
    }

    /// Forget queued answers and resolve a waiting continuation with `None`
    pub fn cancel_target(&mut self) {
        if let Some(session) = self.session.as_mut() {
            session.targeting.queue.clear();
        }
        self.cancel_pending_target();
    }

    /// Target Data from the client: the user picked something
    pub(crate) fn handle_target_s(&mut self, buf: &mut [u8]) -> bool {
        let reply = TargetPacket::parse(buf);
        let Some(session) = self.session.as_mut() else {
            return true;
        };

        if reply.serial != session.player() && reply.serial.is_valid() && reply.target_type == 0 {
            session.targeting.last_target = Some(reply.serial);
        }

        if session.targeting.is_awaiting() {
            let mut target = None;
            if reply.cursor_flag != 0 {
                tracing::error!("Target type should be object (0), got {}", reply.cursor_flag);
            } else if reply.serial.is_valid() {
                let obj = session.world.get_or_create(reply.serial);
                if obj.graphic == 0 {
                    obj.graphic = reply.graphic;
                }
                target = Some(reply.serial);
            }
            self.got_target(target);
            // Our cursor, the server never asked for it
            return false;
        }

        session.targeting.client_targeting = false;
        true
    }

    /// Target Data from the server: it wants the user to pick something
    pub(crate) fn handle_target_r(&mut self, buf: &mut [u8]) -> bool {
        if self.session.is_none() {
            return true;
        }
        self.cancel_pending_target();

        let request = TargetPacket::parse(buf);
        let Some(session) = self.session.as_mut() else {
            return true;
        };

        if let Some(serial) = session.targeting.queue.pop_front() {
            tracing::debug!("Answering target cursor with {}", serial);
            let mut out = BytesMut::new();
            build_target_reply(&mut out, &request, serial);
            self.send_server(&out);
            return false;
        }

        // The client sees the request unchanged; the server gets the cancel
        // form back if our own cursor replaces it
        session.targeting.client_targeting = true;
        session.targeting.cancel_request = Some(TargetPacket {
            serial: Serial::NONE,
            x: INVALID_XY,
            y: INVALID_XY,
            ..request
        });
        true
    }
}
