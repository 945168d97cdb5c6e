//! Decoding of OSC talk events into per-speaker flags.
//!
//! A valid event is a message at the configured address carrying exactly one
//! argument per real speaker, each an `int32` (non-zero means talking) or an
//! OSC boolean. Anything else is rejected whole; the caller's previous flags
//! stay untouched.

use rosc::{OscMessage, OscPacket, OscType};
use smallvec::SmallVec;
use thiserror::Error;

pub type TalkFlags = SmallVec<[bool; 8]>;

#[derive(Debug, Error, PartialEq)]
pub enum IngressError {
    #[error("unrecognized address \"{got}\", use \"{expected}\"")]
    UnknownAddress { expected: String, got: String },
    #[error("expected {expected} args, got {got}")]
    WrongArity { expected: usize, got: usize },
    #[error("expected Int32 or Bool for argument {index}, got {type_name}")]
    WrongArgType { index: usize, type_name: &'static str },
}

fn osc_type_name(arg: &OscType) -> &'static str {
    match arg {
        OscType::Int(_) => "Int32",
        OscType::Float(_) => "Float",
        OscType::String(_) => "String",
        OscType::Blob(_) => "Blob",
        OscType::Time(_) => "Time",
        OscType::Long(_) => "Int64",
        OscType::Double(_) => "Double",
        OscType::Bool(_) => "Bool",
        OscType::Nil => "Nil",
        _ => "unsupported type",
    }
}

/// Validates talk events for a fixed speaker count.
#[derive(Clone, Debug)]
pub struct ActivityIngress {
    address: String,
    speakers: usize,
}

impl ActivityIngress {
    pub fn new(address: impl Into<String>, speakers: usize) -> Self {
        Self {
            address: address.into(),
            speakers,
        }
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn speakers(&self) -> usize {
        self.speakers
    }

    pub fn decode_message(&self, msg: &OscMessage) -> Result<TalkFlags, IngressError> {
        if msg.addr != self.address {
            return Err(IngressError::UnknownAddress {
                expected: self.address.clone(),
                got: msg.addr.clone(),
            });
        }
        if msg.args.len() != self.speakers {
            return Err(IngressError::WrongArity {
                expected: self.speakers,
                got: msg.args.len(),
            });
        }
        msg.args
            .iter()
            .enumerate()
            .map(|(index, arg)| match arg {
                OscType::Int(v) => Ok(*v != 0),
                OscType::Bool(b) => Ok(*b),
                other => Err(IngressError::WrongArgType {
                    index,
                    type_name: osc_type_name(other),
                }),
            })
            .collect()
    }

    /// Decode every message in `packet` (bundles are flattened), calling
    /// `on_flags` for each valid event in order and logging the rest.
    /// Returns the number of valid events.
    pub fn decode_packet(&self, packet: &OscPacket, on_flags: &mut impl FnMut(TalkFlags)) -> usize {
        match packet {
            OscPacket::Message(msg) => match self.decode_message(msg) {
                Ok(flags) => {
                    on_flags(flags);
                    1
                }
                Err(err) => {
                    log::warn!("dropping talk event: {err}");
                    0
                }
            },
            OscPacket::Bundle(bundle) => bundle
                .content
                .iter()
                .map(|inner| self.decode_packet(inner, on_flags))
                .sum(),
        }
    }

    /// Apply the last valid event in `packet` to `flags`. Returns whether
    /// anything was applied.
    pub fn apply_packet(&self, packet: &OscPacket, flags: &mut [bool]) -> bool {
        let mut latest: Option<TalkFlags> = None;
        self.decode_packet(packet, &mut |f| latest = Some(f));
        match latest {
            Some(decoded) if decoded.len() == flags.len() => {
                flags.copy_from_slice(&decoded);
                true
            }
            Some(decoded) => {
                log::warn!(
                    "talk event has {} flags but {} speakers are tracked",
                    decoded.len(),
                    flags.len()
                );
                false
            }
            None => false,
        }
    }
}
