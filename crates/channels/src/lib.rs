//! Channel abstractions shared by the command core and messaging transports.
//!
//! A transport turns inbound platform updates into [`IncomingMessage`]s and
//! implements [`ChannelOutbound`] so the [`delivery`] stage can send the
//! resulting [`OutboundReply`]s back to the originating conversation.

pub mod delivery;
pub mod error;
pub mod plugin;

pub use {
    delivery::{DeliveryReport, deliver},
    error::{Error, Result},
    plugin::{ChannelOutbound, IncomingMessage, OutboundReply},
};
