/// 32-byte short-name directory record and its packed fields
pub(crate) mod entry;

pub(crate) const ENTRY_SIZE: usize = 32;
pub(crate) type RawEntry = [u8; ENTRY_SIZE];

/// First name byte of a record
pub(crate) mod marker {
    pub const END_OF_DIRECTORY: u8 = 0x00;
    /// Stands in for a leading 0xE5 of a live name
    pub const KANJI_E5: u8 = 0x05;
    pub const DELETED: u8 = 0xE5;
}
