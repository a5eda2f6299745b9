//! Types for classifying H264 _Network Abstraction Layer_ Units (NAL Units) as they are cut from
//! the working buffer.

use hex_slice::AsHex;
use std::fmt;

/// The `nal_unit_type` values the assembler acts on. Everything else is passed through untouched.
#[derive(PartialEq, Eq, Hash, Debug, Copy, Clone)]
pub enum UnitType {
    /// Type 5, a slice of an IDR picture and so a sync point
    IdrSlice,
    /// Type 7
    SeqParameterSet,
    /// Type 8
    PicParameterSet,
    Other(u8),
}
impl UnitType {
    /// Classifies the low five bits of a NAL header byte; the upper bits are ignored.
    pub fn from_header_byte(header: u8) -> UnitType {
        match header & 0b0001_1111 {
            5 => UnitType::IdrSlice,
            7 => UnitType::SeqParameterSet,
            8 => UnitType::PicParameterSet,
            other => UnitType::Other(other),
        }
    }
}

/// A view of one NAL unit (header byte included, start code excluded) inside the feeder's
/// working buffer.
///
/// The borrow ends at the next call to [`NalFeeder::next_nal`](crate::feeder::NalFeeder::next_nal),
/// since that call may compact and refill the buffer. Anything that needs the bytes for longer must
/// copy them out first.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct NalUnit<'buf> {
    offset: usize,
    data: &'buf [u8],
}
impl<'buf> NalUnit<'buf> {
    /// `data` must be non-empty.
    pub(crate) fn new(offset: usize, data: &'buf [u8]) -> NalUnit<'buf> {
        debug_assert!(!data.is_empty());
        NalUnit { offset, data }
    }

    /// Position of the first byte of this unit within the working buffer.
    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn data(&self) -> &'buf [u8] {
        self.data
    }

    pub fn unit_type(&self) -> UnitType {
        UnitType::from_header_byte(self.data[0])
    }
}
impl fmt::Debug for NalUnit<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let preview = &self.data[..self.data.len().min(16)];
        f.debug_struct("NalUnit")
            .field("offset", &self.offset)
            .field("len", &self.data.len())
            .field("unit_type", &self.unit_type())
            .field("data", &format_args!("{:02x}", preview.as_hex()))
            .finish()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use test_case::test_case;

    #[test_case(0x67, UnitType::SeqParameterSet; "sps")]
    #[test_case(0x68, UnitType::PicParameterSet; "pps")]
    #[test_case(0x65, UnitType::IdrSlice; "idr")]
    #[test_case(0x25, UnitType::IdrSlice; "idr with lower nal_ref_idc")]
    #[test_case(0x41, UnitType::Other(1); "non idr")]
    #[test_case(0x06, UnitType::Other(6); "sei")]
    #[test_case(0xe7, UnitType::SeqParameterSet; "forbidden bit ignored")]
    fn classify(header: u8, expected: UnitType) {
        assert_eq!(expected, UnitType::from_header_byte(header));
    }

    #[test]
    fn view() {
        let buf = [0, 0, 1, 0x65, 0x88, 0x84];
        let nal = NalUnit::new(3, &buf[3..]);
        assert_eq!(3, nal.offset());
        assert_eq!(3, nal.len());
        assert!(!nal.is_empty());
        assert_eq!(UnitType::IdrSlice, nal.unit_type());
        assert!(format!("{:?}", nal).contains("65 88 84"));
    }
}
