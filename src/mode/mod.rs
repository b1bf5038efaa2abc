//! Value objects passed to the raw open and seek primitives.
//!
//! - [`CreationMode`] - Whether open may or must create the file
//! - [`AccessMode`] - Read, write or both
//! - [`OpenFlags`] - Extra `O_*` behavior flags
//! - [`Permissions`] - Mode bits for newly created files
//! - [`Origin`] - Reference point for seeks

use std::fmt;
use std::ops::{BitAnd, BitOr, BitOrAssign};

use libc::c_int;

/// Controls whether opening a path creates it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CreationMode {
    /// Create the file; fail if it already exists.
    CreateOnly,
    /// Open an existing file; fail if it does not exist.
    OpenOnly,
    /// Open the file, creating it if needed.
    CreateOrOpen,
}

impl CreationMode {
    /// Returns the `open(2)` flag bits for this mode.
    pub fn flags(self) -> c_int {
        match self {
            CreationMode::CreateOnly => libc::O_CREAT | libc::O_EXCL,
            CreationMode::OpenOnly => 0,
            CreationMode::CreateOrOpen => libc::O_CREAT,
        }
    }
}

/// Which directions of I/O the handle allows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccessMode {
    /// Reads only.
    ReadOnly,
    /// Writes only.
    WriteOnly,
    /// Reads and writes.
    ReadWrite,
}

impl AccessMode {
    /// Returns the `open(2)` flag bits for this mode.
    pub fn flags(self) -> c_int {
        match self {
            AccessMode::ReadOnly => libc::O_RDONLY,
            AccessMode::WriteOnly => libc::O_WRONLY,
            AccessMode::ReadWrite => libc::O_RDWR,
        }
    }
}

#[cfg(any(target_os = "linux", target_os = "android"))]
const NO_ATIME_BITS: c_int = libc::O_NOATIME;
#[cfg(not(any(target_os = "linux", target_os = "android")))]
const NO_ATIME_BITS: c_int = 0;

/// Set of option flags that modify how a file behaves once open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct OpenFlags(c_int);

impl OpenFlags {
    /// No options.
    pub const NONE: OpenFlags = OpenFlags(0);
    /// Every write goes to the end of the file.
    pub const APPEND: OpenFlags = OpenFlags(libc::O_APPEND);
    /// Close the descriptor across `exec`.
    pub const CLOSE_ON_EXEC: OpenFlags = OpenFlags(libc::O_CLOEXEC);
    /// Don't update the last access time on reads. No-op off Linux.
    pub const NO_ATIME: OpenFlags = OpenFlags(NO_ATIME_BITS);
    /// Fail if the final path component is a symlink.
    pub const NO_FOLLOW: OpenFlags = OpenFlags(libc::O_NOFOLLOW);
    /// Truncate the file to zero length on open.
    pub const TRUNCATE: OpenFlags = OpenFlags(libc::O_TRUNC);
    /// Writes return only after data and metadata reach the device.
    pub const SYNC: OpenFlags = OpenFlags(libc::O_SYNC);

    /// Returns the raw `open(2)` flag bits.
    pub const fn bits(self) -> c_int {
        self.0
    }

    /// Returns true if every flag in `other` is also set in `self`.
    pub const fn contains(self, other: OpenFlags) -> bool {
        self.0 & other.0 == other.0
    }

    /// Returns true if no flags are set.
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl BitOr for OpenFlags {
    type Output = OpenFlags;

    fn bitor(self, rhs: OpenFlags) -> OpenFlags {
        OpenFlags(self.0 | rhs.0)
    }
}

impl BitOrAssign for OpenFlags {
    fn bitor_assign(&mut self, rhs: OpenFlags) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for OpenFlags {
    type Output = OpenFlags;

    fn bitand(self, rhs: OpenFlags) -> OpenFlags {
        OpenFlags(self.0 & rhs.0)
    }
}

/// Unix permission bits applied when a file is created.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Permissions(u32);

impl Permissions {
    /// No permissions.
    pub const NONE: Permissions = Permissions(0);
    /// Owner may read.
    pub const USER_READ: Permissions = Permissions(0o400);
    /// Owner may write.
    pub const USER_WRITE: Permissions = Permissions(0o200);
    /// Owner may execute.
    pub const USER_EXECUTE: Permissions = Permissions(0o100);
    /// Owner may read and write.
    pub const USER_RW: Permissions = Permissions(0o600);
    /// Owner may read and execute.
    pub const USER_RE: Permissions = Permissions(0o500);
    /// Owner has every permission.
    pub const USER_ALL: Permissions = Permissions(0o700);
    /// Group may read.
    pub const GROUP_READ: Permissions = Permissions(0o040);
    /// Group may write.
    pub const GROUP_WRITE: Permissions = Permissions(0o020);
    /// Group may execute.
    pub const GROUP_EXECUTE: Permissions = Permissions(0o010);
    /// Group may read and write.
    pub const GROUP_RW: Permissions = Permissions(0o060);
    /// Group may read and execute.
    pub const GROUP_RE: Permissions = Permissions(0o050);
    /// Group has every permission.
    pub const GROUP_ALL: Permissions = Permissions(0o070);
    /// Others may read.
    pub const OTHER_READ: Permissions = Permissions(0o004);
    /// Others may write.
    pub const OTHER_WRITE: Permissions = Permissions(0o002);
    /// Others may execute.
    pub const OTHER_EXECUTE: Permissions = Permissions(0o001);
    /// Others may read and write.
    pub const OTHER_RW: Permissions = Permissions(0o006);
    /// Others may read and execute.
    pub const OTHER_RE: Permissions = Permissions(0o005);
    /// Others have every permission.
    pub const OTHER_ALL: Permissions = Permissions(0o007);
    /// Everyone may read.
    pub const ALL_READ: Permissions = Permissions(0o444);
    /// Everyone may write.
    pub const ALL_WRITE: Permissions = Permissions(0o222);
    /// Everyone may execute.
    pub const ALL_EXECUTE: Permissions = Permissions(0o111);
    /// Everyone may read and write.
    pub const ALL_RW: Permissions = Permissions(0o666);
    /// Everyone may read and execute.
    pub const ALL_RE: Permissions = Permissions(0o555);
    /// Everyone has every permission.
    pub const ALL_RWX: Permissions = Permissions(0o777);
    /// Run with the owner's privileges.
    pub const SET_USER_ID: Permissions = Permissions(0o4000);
    /// Run with the group's privileges; on directories, new files inherit the group.
    pub const SET_GROUP_ID: Permissions = Permissions(0o2000);
    /// On directories, only owners may rename or delete entries.
    pub const STICKY: Permissions = Permissions(0o1000);

    /// Creates a permission set from raw mode bits. Bits above `0o7777` are dropped.
    pub const fn from_bits(bits: u32) -> Self {
        Permissions(bits & 0o7777)
    }

    /// Returns the raw mode bits.
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Returns true if every bit in `other` is also set in `self`.
    pub const fn contains(self, other: Permissions) -> bool {
        self.0 & other.0 == other.0
    }

    /// Returns true if no bits are set.
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl BitOr for Permissions {
    type Output = Permissions;

    fn bitor(self, rhs: Permissions) -> Permissions {
        Permissions(self.0 | rhs.0)
    }
}

impl BitOrAssign for Permissions {
    fn bitor_assign(&mut self, rhs: Permissions) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for Permissions {
    type Output = Permissions;

    fn bitand(self, rhs: Permissions) -> Permissions {
        Permissions(self.0 & rhs.0)
    }
}

impl fmt::Display for Permissions {
    /// Formats as `ls -l` does, e.g. `rwxr-x---` or `rwsr-xr-t`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bits = self.0;
        let triple = |shift: u32, special: u32, set: char, unset: char| {
            let r = if bits & (0o4 << shift) != 0 { 'r' } else { '-' };
            let w = if bits & (0o2 << shift) != 0 { 'w' } else { '-' };
            let x = match (bits & (0o1 << shift) != 0, bits & special != 0) {
                (true, true) => set,
                (false, true) => unset,
                (true, false) => 'x',
                (false, false) => '-',
            };
            [r, w, x]
        };
        let all = [
            triple(6, 0o4000, 's', 'S'),
            triple(3, 0o2000, 's', 'S'),
            triple(0, 0o1000, 't', 'T'),
        ];
        for c in all.iter().flatten() {
            write!(f, "{}", c)?;
        }
        Ok(())
    }
}

/// Reference point for a seek offset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Origin {
    /// Relative to the current position.
    #[default]
    Current,
    /// Relative to the start of the file.
    Start,
    /// Relative to the end of the file.
    End,
}

impl Origin {
    /// Returns the `lseek(2)` whence value.
    pub fn whence(self) -> c_int {
        match self {
            Origin::Current => libc::SEEK_CUR,
            Origin::Start => libc::SEEK_SET,
            Origin::End => libc::SEEK_END,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_creation_mode_flags() {
        assert_eq!(
            CreationMode::CreateOnly.flags(),
            libc::O_CREAT | libc::O_EXCL
        );
        assert_eq!(CreationMode::OpenOnly.flags(), 0);
        assert_eq!(CreationMode::CreateOrOpen.flags(), libc::O_CREAT);
    }

    #[test]
    fn test_open_flags_combine() {
        let flags = OpenFlags::APPEND | OpenFlags::SYNC;
        assert!(flags.contains(OpenFlags::APPEND));
        assert!(flags.contains(OpenFlags::SYNC));
        assert!(!flags.contains(OpenFlags::TRUNCATE));
        assert!(OpenFlags::NONE.is_empty());
        assert_eq!((flags & OpenFlags::APPEND), OpenFlags::APPEND);
    }

    #[test]
    fn test_permissions_combinations() {
        assert_eq!(
            Permissions::USER_READ | Permissions::USER_WRITE,
            Permissions::USER_RW
        );
        assert_eq!(
            Permissions::USER_RW | Permissions::GROUP_RW | Permissions::OTHER_RW,
            Permissions::ALL_RW
        );
        assert!(Permissions::ALL_RWX.contains(Permissions::GROUP_EXECUTE));
        assert_eq!(Permissions::from_bits(0o10644).bits(), 0o644);
    }

    #[test]
    fn test_permissions_display() {
        assert_eq!(Permissions::ALL_RW.to_string(), "rw-rw-rw-");
        assert_eq!(
            (Permissions::USER_ALL | Permissions::GROUP_RE).to_string(),
            "rwxr-x---"
        );
        assert_eq!(
            (Permissions::USER_ALL | Permissions::SET_USER_ID).to_string(),
            "rws------"
        );
        assert_eq!(
            (Permissions::ALL_RW | Permissions::STICKY).to_string(),
            "rw-rw-rwT"
        );
    }

    #[test]
    fn test_origin_whence() {
        assert_eq!(Origin::Start.whence(), libc::SEEK_SET);
        assert_eq!(Origin::Current.whence(), libc::SEEK_CUR);
        assert_eq!(Origin::End.whence(), libc::SEEK_END);
    }
}
