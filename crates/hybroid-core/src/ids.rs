//! Environment handles.
//!
//! Every compilation unit and every built-in library is addressed by a small
//! [`EnvId`]. The first ids are reserved for the libraries so a handle alone
//! tells whether it points at user code or at the engine API.

use std::fmt;

use num_enum::{IntoPrimitive, TryFromPrimitive};

/// Handle to an environment: a user source file or a built-in library.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EnvId(u32);

impl EnvId {
    /// First id handed out to user environments.
    pub const FIRST_USER: u32 = Library::COUNT as u32;

    /// Handle of the `index`-th user environment.
    #[inline]
    pub fn user(index: usize) -> Self {
        Self(Self::FIRST_USER + index as u32)
    }

    /// Raw id value.
    #[inline]
    pub fn raw(self) -> u32 {
        self.0
    }

    /// Position among user environments, `None` for libraries.
    #[inline]
    pub fn user_index(self) -> Option<usize> {
        self.0.checked_sub(Self::FIRST_USER).map(|i| i as usize)
    }

    /// The library this handle names, if any.
    #[inline]
    pub fn library(self) -> Option<Library> {
        u8::try_from(self.0)
            .ok()
            .and_then(|raw| Library::try_from(raw).ok())
    }

    /// Whether this handle names a built-in library.
    #[inline]
    pub fn is_library(self) -> bool {
        self.0 < Self::FIRST_USER
    }
}

impl fmt::Display for EnvId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.library() {
            Some(lib) => write!(f, "{}", lib.name()),
            None => write!(f, "env#{}", self.0),
        }
    }
}

/// Built-in library environments, pre-built once per session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, IntoPrimitive, TryFromPrimitive)]
#[repr(u8)]
pub enum Library {
    /// Implicitly visible helpers (`ToString`, `ParseSound`, vertex aliases).
    Builtin = 0,
    /// Engine entry points and enums.
    Pewpew = 1,
    /// Deterministic fixed-point math.
    Fmath = 2,
    /// Floating-point math, unavailable to levels.
    Math = 3,
    /// String helpers.
    String = 4,
    /// List helpers.
    Table = 5,
}

impl Library {
    /// Number of built-in libraries.
    pub const COUNT: usize = 6;

    /// All libraries in id order.
    pub const ALL: [Library; Library::COUNT] = [
        Library::Builtin,
        Library::Pewpew,
        Library::Fmath,
        Library::Math,
        Library::String,
        Library::Table,
    ];

    /// The reserved environment handle of this library.
    #[inline]
    pub fn env_id(self) -> EnvId {
        EnvId(u8::from(self) as u32)
    }

    /// The name used to reach the library from source (`Pewpew::Print`).
    pub fn name(self) -> &'static str {
        match self {
            Library::Builtin => "Builtin",
            Library::Pewpew => "Pewpew",
            Library::Fmath => "Fmath",
            Library::Math => "Math",
            Library::String => "String",
            Library::Table => "Table",
        }
    }

    /// Look a library up by its source name. `Builtin` is not addressable.
    pub fn from_name(name: &str) -> Option<Library> {
        match name {
            "Pewpew" => Some(Library::Pewpew),
            "Fmath" => Some(Library::Fmath),
            "Math" => Some(Library::Math),
            "String" => Some(Library::String),
            "Table" => Some(Library::Table),
            _ => None,
        }
    }
}

/// What a compilation unit produces, which decides what it may access.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EnvKind {
    /// A playable level script.
    Level,
    /// A mesh description.
    Mesh,
    /// A sound description.
    Sound,
    /// Code shared between other environments.
    Shared,
}

impl EnvKind {
    /// Parse the kind named in an `env Name as Kind` declaration.
    pub fn from_name(name: &str) -> Option<EnvKind> {
        match name {
            "Level" => Some(EnvKind::Level),
            "Mesh" => Some(EnvKind::Mesh),
            "Sound" => Some(EnvKind::Sound),
            "Shared" => Some(EnvKind::Shared),
            _ => None,
        }
    }

    /// Whether code in `self` may reach into an environment of kind `target`.
    pub fn can_access(self, target: EnvKind) -> bool {
        match self {
            EnvKind::Mesh | EnvKind::Sound => target == EnvKind::Shared,
            EnvKind::Level => !matches!(target, EnvKind::Mesh | EnvKind::Sound),
            EnvKind::Shared => true,
        }
    }

    /// Whether code in `self` may use `library`.
    pub fn can_use(self, library: Library) -> bool {
        !(self == EnvKind::Level && library == Library::Math)
    }
}

impl fmt::Display for EnvKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EnvKind::Level => "Level",
            EnvKind::Mesh => "Mesh",
            EnvKind::Sound => "Sound",
            EnvKind::Shared => "Shared",
        };
        f.write_str(name)
    }
}
