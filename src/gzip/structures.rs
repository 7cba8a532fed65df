/// gzip magic bytes (RFC 1952).
pub const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Fixed part of the member header: magic, method, flags, mtime, xfl, os.
pub const FIXED_HEADER_SIZE: usize = 10;

/// gzip compression methods
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompressionMethod {
    Deflate,
    Unknown(u8),
}

impl CompressionMethod {
    pub fn from_u8(value: u8) -> Self {
        match value {
            8 => CompressionMethod::Deflate,
            _ => CompressionMethod::Unknown(value),
        }
    }

    pub fn as_u8(&self) -> u8 {
        match self {
            CompressionMethod::Deflate => 8,
            CompressionMethod::Unknown(v) => *v,
        }
    }
}

/// The FLG byte of a gzip member header.
///
/// Each bit switches an optional header field on. Bits 5-7 are reserved
/// and must be zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FlagBits(pub u8);

impl FlagBits {
    pub const TEXT: u8 = 0x01;
    pub const HEADER_CRC: u8 = 0x02;
    pub const EXTRA: u8 = 0x04;
    pub const NAME: u8 = 0x08;
    pub const COMMENT: u8 = 0x10;
    pub const RESERVED: u8 = 0xe0;

    pub fn bits(&self) -> u8 {
        self.0
    }

    /// Compressor's hint that the payload is probably text.
    pub fn is_text(&self) -> bool {
        self.0 & Self::TEXT != 0
    }

    pub fn has_header_crc(&self) -> bool {
        self.0 & Self::HEADER_CRC != 0
    }

    pub fn has_extra(&self) -> bool {
        self.0 & Self::EXTRA != 0
    }

    pub fn has_name(&self) -> bool {
        self.0 & Self::NAME != 0
    }

    pub fn has_comment(&self) -> bool {
        self.0 & Self::COMMENT != 0
    }

    /// Reserved bits that are set, if any.
    pub fn reserved(&self) -> u8 {
        self.0 & Self::RESERVED
    }
}

/// Filesystem the member was written on (OS byte).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperatingSystem {
    Fat,
    Amiga,
    Vms,
    Unix,
    VmCms,
    AtariTos,
    Hpfs,
    Macintosh,
    ZSystem,
    CpM,
    Tops20,
    Ntfs,
    Qdos,
    AcornRiscos,
    Unknown,
    Other(u8),
}

impl OperatingSystem {
    pub fn from_u8(value: u8) -> Self {
        match value {
            0 => OperatingSystem::Fat,
            1 => OperatingSystem::Amiga,
            2 => OperatingSystem::Vms,
            3 => OperatingSystem::Unix,
            4 => OperatingSystem::VmCms,
            5 => OperatingSystem::AtariTos,
            6 => OperatingSystem::Hpfs,
            7 => OperatingSystem::Macintosh,
            8 => OperatingSystem::ZSystem,
            9 => OperatingSystem::CpM,
            10 => OperatingSystem::Tops20,
            11 => OperatingSystem::Ntfs,
            12 => OperatingSystem::Qdos,
            13 => OperatingSystem::AcornRiscos,
            255 => OperatingSystem::Unknown,
            v => OperatingSystem::Other(v),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            OperatingSystem::Fat => "FAT",
            OperatingSystem::Amiga => "Amiga",
            OperatingSystem::Vms => "VMS",
            OperatingSystem::Unix => "Unix",
            OperatingSystem::VmCms => "VM/CMS",
            OperatingSystem::AtariTos => "Atari TOS",
            OperatingSystem::Hpfs => "HPFS",
            OperatingSystem::Macintosh => "Macintosh",
            OperatingSystem::ZSystem => "Z-System",
            OperatingSystem::CpM => "CP/M",
            OperatingSystem::Tops20 => "TOPS-20",
            OperatingSystem::Ntfs => "NTFS",
            OperatingSystem::Qdos => "QDOS",
            OperatingSystem::AcornRiscos => "Acorn RISCOS",
            OperatingSystem::Unknown | OperatingSystem::Other(_) => "unknown",
        }
    }
}

/// Parsed gzip member header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerDescriptor {
    pub magic: [u8; 2],
    pub compression_method: CompressionMethod,
    pub flags: FlagBits,
    /// Seconds since the Unix epoch, 0 if not recorded.
    pub modification_time: u64,
    pub extra_flags: u8,
    pub os_type: u8,
    /// Length of the skipped extra field, when present.
    pub extra_field_len: Option<u16>,
    pub file_name: Option<String>,
    pub comment: Option<String>,
    /// Stored CRC16 of the header. Zero when absent.
    pub header_checksum: u16,
    /// Index of the first compressed byte in the source buffer.
    pub payload_offset: usize,
}

impl ContainerDescriptor {
    pub fn operating_system(&self) -> OperatingSystem {
        OperatingSystem::from_u8(self.os_type)
    }

    /// Compressed payload (and trailer) of `buf`, the buffer this header was parsed from.
    pub fn payload<'a>(&self, buf: &'a [u8]) -> &'a [u8] {
        buf.get(self.payload_offset..).unwrap_or_default()
    }
}
