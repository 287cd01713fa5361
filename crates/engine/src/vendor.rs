//! # Vendor Automation
//!
//! `buy` and `sell` ask a shopkeeper for their lists by speaking to them
//! and open a single correlation slot. The reply messages are then
//! answered from the named shopping list instead of being shown:
//!
//! ```text
//! buy:  Vendor Buy List (0x74) + Open Container gump 0x30 -> Vendor Buy Reply (0x3B)
//! sell: Vendor Sell List (0x9E)                           -> Vendor Sell Reply (0x9F)
//! ```
//!
//! The buy list carries prices and names only; its entries pair up in
//! order with the items of the vendor's buy container.

use crate::engine::Engine;
use bytes::BytesMut;
use uoinject_config::{ShoppingItem, Want};
use uoinject_core::Serial;
use uoinject_protocol::{
    build_client_talk, build_vendor_buy_reply, build_vendor_sell_reply, unpack_big_u16, unpack_big_u32,
    VendorBuyListPacket, VendorSellListPacket, GUMP_VENDOR, SYSTEM_FONT,
};

/// Colour of speech sent on the user's behalf
const SPEECH_COLOUR: u16 = 0x02b2;

/// Which way a shopping trip goes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VendorMode {
    Buy,
    Sell,
}

impl VendorMode {
    fn keyword(self) -> &'static str {
        match self {
            VendorMode::Buy => "buy",
            VendorMode::Sell => "sell",
        }
    }
}

/// A shopping trip waiting for the vendor's list
#[derive(Debug, Clone)]
struct VendorRequest {
    mode: VendorMode,
    list_name: String,
    items: Vec<ShoppingItem>,
}

/// Vendor correlation state of a session
#[derive(Debug, Default)]
pub struct VendorState {
    pending: Option<VendorRequest>,
    buy_list: Option<VendorBuyListPacket>,
    /// Last list seen, formatted for `shop`
    shop_lines: Vec<String>,
}

impl VendorState {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Mode of the trip in progress
    pub fn pending(&self) -> Option<VendorMode> {
        self.pending.as_ref().map(|request| request.mode)
    }

    pub fn shop_lines(&self) -> &[String] {
        &self.shop_lines
    }
}

/// How many of `available` a shopping line asks for
fn wanted(want: Want, available: u16) -> u16 {
    match want {
        Want::All => available,
        Want::Count(count) => count.min(available as u32) as u16,
    }
}

fn requested(want: Want, available: u16) -> u32 {
    match want {
        Want::All => available as u32,
        Want::Count(count) => count,
    }
}

impl Engine {
    /// Start buying `list_name` from `vendor` (default: any vendor)
    pub fn buy(&mut self, list_name: &str, vendor: Option<&str>) {
        self.start_trip(VendorMode::Buy, list_name, vendor);
    }

    /// Start selling `list_name` to `vendor`
    pub fn sell(&mut self, list_name: &str, vendor: Option<&str>) {
        self.start_trip(VendorMode::Sell, list_name, vendor);
    }

    fn start_trip(&mut self, mode: VendorMode, list_name: &str, vendor: Option<&str>) {
        let Some(items) = self.config.shopping_list(list_name) else {
            self.client_print(&format!("Shopping list '{}' not found", list_name));
            return;
        };
        let Some(session) = self.session.as_mut() else {
            return;
        };
        if let Some(previous) = session.vendor.pending.replace(VendorRequest {
            mode,
            list_name: list_name.to_string(),
            items,
        }) {
            tracing::warn!("Replacing unfinished {} of '{}'", previous.mode.keyword(), previous.list_name);
        }

        let speech = format!("{} {}", vendor.unwrap_or("vendor"), mode.keyword());
        tracing::debug!("Saying '{}'", speech);
        let mut out = BytesMut::new();
        build_client_talk(&mut out, 0, SPEECH_COLOUR, SYSTEM_FONT, speech.as_bytes());
        self.send_server(&out);
    }

    /// Print the last vendor list
    pub fn shop(&mut self) {
        let lines = match self.session.as_ref() {
            Some(session) => session.vendor.shop_lines.clone(),
            None => return,
        };
        if lines.is_empty() {
            self.client_print("No vendor list seen.");
            return;
        }
        for line in lines {
            self.client_print(&line);
        }
    }

    /// Vendor Buy List (0x74)
    pub(crate) fn handle_vendor_buy_list(&mut self, buf: &mut [u8]) -> bool {
        let list = match VendorBuyListPacket::parse(buf) {
            Ok(list) => list,
            Err(err) => {
                tracing::warn!("Bad vendor buy list: {}", err);
                return true;
            }
        };
        if list.wire_len != buf.len() {
            tracing::warn!("Vendor buy list decoded {} bytes of {}", list.wire_len, buf.len());
        }
        let Some(session) = self.session.as_mut() else {
            return true;
        };
        session.vendor.shop_lines = list
            .entries
            .iter()
            .map(|entry| format!("{}: {} gp", entry.name, entry.price))
            .collect();
        session.vendor.buy_list = Some(list);
        true
    }

    /// Open Container (0x24): a gump 0x30 is the shopkeeper's buy window
    pub(crate) fn handle_open_container(&mut self, buf: &mut [u8]) -> bool {
        if unpack_big_u16(buf, 5) != GUMP_VENDOR {
            return true;
        }
        let vendor = Serial(unpack_big_u32(buf, 1));
        let Some(session) = self.session.as_mut() else {
            return true;
        };
        if session.vendor.pending() != Some(VendorMode::Buy) {
            return true;
        }
        let Some(list) = session.vendor.buy_list.take() else {
            tracing::warn!("Vendor window without a buy list");
            return true;
        };
        let Some(request) = session.vendor.pending.take() else {
            return true;
        };

        let stock = session.world.contents(list.container);
        if stock.len() != list.entries.len() {
            tracing::warn!("Buy list has {} entries for {} items", list.entries.len(), stock.len());
        }

        let mut reply = Vec::new();
        let mut report = Vec::new();
        let mut total: u64 = 0;
        for item in &request.items {
            let found = list
                .entries
                .iter()
                .zip(stock.iter())
                .find(|(entry, _)| entry.name.eq_ignore_ascii_case(&item.name));
            let (amount, available) = match found {
                Some((entry, obj)) => {
                    let available = obj.quantity.max(1);
                    let amount = wanted(item.want, available);
                    if amount > 0 {
                        reply.push((obj.serial, amount));
                        total += entry.price as u64 * amount as u64;
                    }
                    (amount, available)
                }
                None => (0, 0),
            };
            report.push(format!("Bought {}/{} of '{}'", amount, requested(item.want, available), item.name));
        }
        report.push(format!("Total cost: {} gp", total));

        let mut out = BytesMut::new();
        build_vendor_buy_reply(&mut out, vendor, &reply);
        self.send_server(&out);
        for line in report {
            self.client_print(&line);
        }
        false
    }

    /// Vendor Sell List (0x9E)
    pub(crate) fn handle_vendor_sell_list(&mut self, buf: &mut [u8]) -> bool {
        let list = match VendorSellListPacket::parse(buf) {
            Ok(list) => list,
            Err(err) => {
                tracing::warn!("Bad vendor sell list: {}", err);
                return true;
            }
        };
        if list.wire_len != buf.len() {
            tracing::warn!("Vendor sell list decoded {} bytes of {}", list.wire_len, buf.len());
        }
        let Some(session) = self.session.as_mut() else {
            return true;
        };
        session.vendor.shop_lines = list
            .entries
            .iter()
            .map(|entry| format!("{} ({}): {} gp", entry.name, entry.amount, entry.price))
            .collect();
        if session.vendor.pending() != Some(VendorMode::Sell) {
            return true;
        }
        let Some(request) = session.vendor.pending.take() else {
            return true;
        };

        let mut reply = Vec::new();
        let mut report = Vec::new();
        let mut total: u64 = 0;
        for item in &request.items {
            let mut sold = 0u32;
            let mut available = 0u16;
            for entry in list.entries.iter().filter(|entry| entry.name.eq_ignore_ascii_case(&item.name)) {
                available = available.saturating_add(entry.amount);
                let limit = match item.want {
                    Want::All => entry.amount,
                    Want::Count(count) => count.saturating_sub(sold).min(entry.amount as u32) as u16,
                };
                if limit > 0 {
                    reply.push((entry.serial, limit));
                    sold += limit as u32;
                    total += entry.price as u64 * limit as u64;
                }
            }
            report.push(format!("Sold {}/{} of '{}'", sold, requested(item.want, available), item.name));
        }
        report.push(format!("Total: {} gp", total));

        let mut out = BytesMut::new();
        build_vendor_sell_reply(&mut out, list.vendor, &reply);
        self.send_server(&out);
        for line in report {
            self.client_print(&line);
        }
        false
    }

    /// Vendor Buy Reply (0x3B), either direction
    pub(crate) fn handle_vendor_buy_reply(&mut self, buf: &mut [u8]) -> bool {
        tracing::debug!("Vendor buy reply for {:08x}, {} bytes", unpack_big_u32(buf, 3), buf.len());
        true
    }

    /// Vendor Sell Reply (0x9F)
    pub(crate) fn handle_vendor_sell_reply(&mut self, buf: &mut [u8]) -> bool {
        tracing::debug!("Vendor sell reply for {:08x}, {} items", unpack_big_u32(buf, 3), unpack_big_u16(buf, 7));
        true
    }
}
