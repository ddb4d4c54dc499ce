//! Packed 32-bit message-ID decoding.
//!
//! Legacy message resources pack three fields into each 32-bit message ID:
//! the top nybble hints at the message type, the next twelve bits carry a
//! facility code, and the low 16 bits are the developer-assigned message
//! number. The type table follows the message-compiler conventions and is
//! best-effort only; it annotates records, it never rejects them.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PackedMessageId(pub u32);

impl PackedMessageId {
    /// Top hex digit of the packed value (the message-type hint).
    pub fn type_nybble(self) -> u8 {
        (self.0 >> 28) as u8
    }

    /// Facility code, the three hex digits following the type nybble.
    pub fn facility_code(self) -> String {
        format!("{:03x}", (self.0 >> 16) & 0x0fff)
    }

    /// The developer-assigned message number (low 16 bits).
    pub fn low16(self) -> u16 {
        (self.0 & 0xffff) as u16
    }

    pub fn type_label(self) -> &'static str {
        message_type_label(self.type_nybble())
    }
}

/// Best-effort mapping from the type nybble to a human-readable label.
///
/// Severity encodings (0x0/0x4/0x8/0xc) and manifest metadata ranges share
/// the same nybble space, so the label is a hint, not a guarantee. Unknown
/// nybbles yield an empty label.
pub fn message_type_label(nybble: u8) -> &'static str {
    match nybble {
        0x0 => "Success",
        0x1 => "Keywords",
        0x3 => "Opcode",
        0x4 => "Informational",
        0x5 => "Level",
        0x7 => "Task",
        0x8 => "Warning",
        0x9 => "Provider/Channel",
        0xb => "Event",
        0xc => "Error",
        _ => "",
    }
}
