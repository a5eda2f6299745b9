//! Format description handed to the muxer before any access unit is read.

use std::fmt;

/// OMX colour formats a YUV420 input may be declared as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorFormat {
    Yuv420SemiPlanar,
    Yuv420Planar,
    TiYuv420PackedSemiPlanar,
    QcomYvu420SemiPlanar,
    Other(u32),
}
impl ColorFormat {
    const OMX_YUV420_PLANAR: u32 = 0x13;
    const OMX_YUV420_SEMI_PLANAR: u32 = 0x15;
    const OMX_TI_YUV420_PACKED_SEMI_PLANAR: u32 = 0x7F00_0100;
    const OMX_QCOM_YVU420_SEMI_PLANAR: u32 = 0x7FA3_0C00;

    /// Maps the value given on the command line: `0` for semi-planar, `1` for planar, or one of
    /// the vendor-specific OMX values. Anything else is rejected.
    pub fn from_cli_value(value: u32) -> Option<ColorFormat> {
        match value {
            0 => Some(ColorFormat::Yuv420SemiPlanar),
            1 => Some(ColorFormat::Yuv420Planar),
            Self::OMX_TI_YUV420_PACKED_SEMI_PLANAR => Some(ColorFormat::TiYuv420PackedSemiPlanar),
            Self::OMX_QCOM_YVU420_SEMI_PLANAR => Some(ColorFormat::QcomYvu420SemiPlanar),
            _ => None,
        }
    }

    /// The OMX enum value the downstream pipeline expects in the colour-format tag.
    pub fn omx_value(self) -> u32 {
        match self {
            ColorFormat::Yuv420SemiPlanar => Self::OMX_YUV420_SEMI_PLANAR,
            ColorFormat::Yuv420Planar => Self::OMX_YUV420_PLANAR,
            ColorFormat::TiYuv420PackedSemiPlanar => Self::OMX_TI_YUV420_PACKED_SEMI_PLANAR,
            ColorFormat::QcomYvu420SemiPlanar => Self::OMX_QCOM_YVU420_SEMI_PLANAR,
            ColorFormat::Other(v) => v,
        }
    }
}
impl From<u32> for ColorFormat {
    fn from(v: u32) -> Self {
        match v {
            Self::OMX_YUV420_SEMI_PLANAR => ColorFormat::Yuv420SemiPlanar,
            Self::OMX_YUV420_PLANAR => ColorFormat::Yuv420Planar,
            Self::OMX_TI_YUV420_PACKED_SEMI_PLANAR => ColorFormat::TiYuv420PackedSemiPlanar,
            Self::OMX_QCOM_YVU420_SEMI_PLANAR => ColorFormat::QcomYvu420SemiPlanar,
            v => ColorFormat::Other(v),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mime {
    /// Annex B H264, passed through without re-encoding
    Avc,
    /// Uncompressed frames that still need an encoder
    Raw,
}
impl Mime {
    pub fn as_str(self) -> &'static str {
        match self {
            Mime::Avc => "video/avc",
            Mime::Raw => "video/raw",
        }
    }
}
impl fmt::Display for Mime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceFormat {
    pub width: u32,
    pub height: u32,
    pub color_format: ColorFormat,
    pub mime: Mime,
}

/// Builds the RFC 6381 `avc1.PPCCLL` codec identifier from the `profile_idc`, `constraint_flags`
/// and `level_idc` bytes following the header of an SPS NAL unit, or `None` if the SPS is too
/// short to carry them.
pub fn avc1_codec(sps: &[u8]) -> Option<rfc6381_codec::Codec> {
    match sps {
        [_header, profile_idc, constraint_flags, level_idc, ..] => Some(
            rfc6381_codec::Codec::avc1(*profile_idc, *constraint_flags, *level_idc),
        ),
        _ => None,
    }
}
