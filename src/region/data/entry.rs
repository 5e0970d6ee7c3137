use bitfield::bitfield;
#[cfg(feature = "chrono")]
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use derive_more::{From, Into};

use super::marker::{DELETED, END_OF_DIRECTORY, KANJI_E5};
use super::{RawEntry, ENTRY_SIZE};
use crate::endian::Little as LE;
use crate::region::{decode, encode, Plain};
use crate::types::ClusterID;
use crate::variant::FatVariant;

bitfield! {
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq, From, Into)]
    pub struct Attributes(u8);
    pub read_only, set_read_only: 0;
    pub hidden, set_hidden: 1;
    pub system, set_system: 2;
    pub volume_label, set_volume_label: 3;
    pub directory, set_directory: 4;
    pub archive, set_archive: 5;
}

impl Attributes {
    const LONG_NAME: u8 = 0x0F;

    /// Fragment of a VFAT long name, never a file on its own
    pub fn is_long_name(&self) -> bool {
        self.0 & 0x3F == Self::LONG_NAME
    }
}

bitfield! {
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq, From, Into)]
    pub struct Date(u16);
    year_offset, set_year_offset: 15, 9;
    pub month, set_month: 8, 5;
    pub day, set_day: 4, 0;
}

impl Date {
    pub fn year(&self) -> u16 {
        self.year_offset() + 1980
    }

    /// Years before 1980 are stored as 1980
    pub fn set_year(&mut self, year: u16) {
        self.set_year_offset(year.saturating_sub(1980))
    }
}

bitfield! {
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq, From, Into)]
    pub struct Time(u16);
    pub hour, set_hour: 15, 11;
    pub minute, set_minute: 10, 5;
    pub double_second, set_double_second: 4, 0;
}

impl Time {
    pub fn second(&self) -> u16 {
        self.double_second() * 2
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct DateTime {
    pub date: Date,
    pub time: Time,
    /// Creation time only, 0..=199
    pub centisecond: u8,
}

#[cfg(feature = "chrono")]
impl From<DateTime> for NaiveDateTime {
    fn from(datetime: DateTime) -> Self {
        let (date, time) = (datetime.date, datetime.time);
        let (year, month, day) = (date.year() as i32, date.month() as u32, date.day() as u32);
        let date = NaiveDate::from_ymd_opt(year, month, day);
        let (hour, minute) = (time.hour() as u32, time.minute() as u32);
        let second = time.second() as u32 + datetime.centisecond as u32 / 100;
        let millis = (datetime.centisecond as u32 % 100) * 10;
        let time = NaiveTime::from_hms_milli_opt(hour, minute, second, millis);
        NaiveDateTime::new(date.unwrap_or_default(), time.unwrap_or_default())
    }
}

/// Outcome of decoding one 32-byte slot
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Slot {
    Record(DirectoryRecord),
    Deleted,
    /// No live record follows in this directory
    EndOfDirectory,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[repr(C, packed(1))]
pub struct DirectoryRecord {
    name: [u8; 11],
    attributes: u8,
    _reserved: u8,
    create_centisecond: u8,
    create_time: LE<u16>,
    create_date: LE<u16>,
    access_date: LE<u16>,
    first_cluster_high: LE<u16>, // FAT32 only
    modify_time: LE<u16>,
    modify_date: LE<u16>,
    first_cluster_low: LE<u16>,
    file_size: LE<u32>,
}

unsafe impl Plain for DirectoryRecord {}

const _: () = assert!(core::mem::size_of::<DirectoryRecord>() == ENTRY_SIZE);

impl DirectoryRecord {
    pub fn new(name: [u8; 11], attributes: Attributes, first_cluster: u32, size: u32) -> Self {
        Self {
            name,
            attributes: attributes.into(),
            first_cluster_high: ((first_cluster >> 16) as u16).into(),
            first_cluster_low: (first_cluster as u16).into(),
            file_size: size.into(),
            ..Default::default()
        }
    }

    pub fn with_modified(mut self, datetime: DateTime) -> Self {
        self.modify_date = u16::from(datetime.date).into();
        self.modify_time = u16::from(datetime.time).into();
        self
    }

    pub fn decode(raw: &RawEntry) -> Slot {
        match raw[0] {
            END_OF_DIRECTORY => Slot::EndOfDirectory,
            DELETED => Slot::Deleted,
            _ => decode(raw).map_or(Slot::EndOfDirectory, Slot::Record),
        }
    }

    pub fn to_bytes(&self) -> RawEntry {
        let mut raw = [0u8; ENTRY_SIZE];
        raw.copy_from_slice(encode(self));
        raw
    }

    /// Name bytes exactly as stored, space padded
    pub fn raw_name(&self) -> [u8; 11] {
        self.name
    }

    /// Stored name with the 0x05 escape of a leading 0xE5 undone
    pub fn short_name(&self) -> [u8; 11] {
        let mut name = self.name;
        if name[0] == KANJI_E5 {
            name[0] = DELETED;
        }
        name
    }

    /// `NAME.EXT` with padding removed, bytes outside printable ASCII shown as `?`
    pub fn name(&self) -> heapless::String<12> {
        let short_name = self.short_name();
        let trim = |bytes: &[u8]| bytes.len() - bytes.iter().rev().take_while(|&&b| b == b' ').count();
        let (base, extension) = short_name.split_at(8);
        let base = &base[..trim(base)];
        let extension = &extension[..trim(extension)];
        let printable = |b: u8| match b {
            0x20..=0x7E => b as char,
            _ => '?',
        };
        let mut name = heapless::String::new();
        // At most 12 ASCII chars, always fits
        for &b in base.iter() {
            name.push(printable(b)).ok();
        }
        if !extension.is_empty() {
            name.push('.').ok();
            for &b in extension.iter() {
                name.push(printable(b)).ok();
            }
        }
        name
    }

    pub fn attributes(&self) -> Attributes {
        Attributes(self.attributes)
    }

    /// High word is only meaningful on FAT32
    pub fn first_cluster(&self, variant: FatVariant) -> ClusterID {
        let low = self.first_cluster_low.to_ne() as u32;
        let cluster = match variant {
            FatVariant::FAT32 => (self.first_cluster_high.to_ne() as u32) << 16 | low,
            _ => low,
        };
        ClusterID::from(cluster)
    }

    pub fn size(&self) -> u32 {
        self.file_size.to_ne()
    }

    pub fn is_directory(&self) -> bool {
        let attributes = self.attributes();
        !attributes.is_long_name() && attributes.directory()
    }

    pub fn is_volume_label(&self) -> bool {
        let attributes = self.attributes();
        !attributes.is_long_name() && attributes.volume_label()
    }

    pub fn is_long_name(&self) -> bool {
        self.attributes().is_long_name()
    }

    /// Regular file, neither directory, volume label nor long-name fragment
    pub fn is_file(&self) -> bool {
        let attributes = self.attributes();
        !attributes.is_long_name() && !attributes.directory() && !attributes.volume_label()
    }

    /// `.` or `..`
    pub fn is_dot(&self) -> bool {
        matches!(&self.name, b".          " | b"..         ")
    }

    pub fn created(&self) -> DateTime {
        DateTime {
            date: Date(self.create_date.to_ne()),
            time: Time(self.create_time.to_ne()),
            centisecond: self.create_centisecond,
        }
    }

    pub fn modified(&self) -> DateTime {
        DateTime {
            date: Date(self.modify_date.to_ne()),
            time: Time(self.modify_time.to_ne()),
            centisecond: 0,
        }
    }

    /// Only a date is recorded for last access
    pub fn accessed(&self) -> Date {
        Date(self.access_date.to_ne())
    }
}
