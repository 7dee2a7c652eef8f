//! Strongly typed identifier wrappers.
//!
//! `StudentId` and `CafeteriaId` are dense indices: the inner integer is the
//! position of the agent in its population `Vec`.  `AgentId` tags an index
//! with its role and is the address type every message carries.

use std::fmt;

/// Generate a typed ID wrapper around a primitive integer.
macro_rules! typed_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident($inner:ty);) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        $vis struct $name(pub $inner);

        impl $name {
            /// Sentinel meaning "no valid ID".
            pub const INVALID: $name = $name(<$inner>::MAX);

            /// Cast to `usize` for direct use as a `Vec` index.
            #[inline(always)]
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl Default for $name {
            /// Returns the `INVALID` sentinel so uninitialized IDs are visibly invalid.
            #[inline(always)]
            fn default() -> Self {
                Self::INVALID
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl From<$name> for usize {
            #[inline(always)]
            fn from(id: $name) -> usize {
                id.0 as usize
            }
        }

        impl TryFrom<usize> for $name {
            type Error = std::num::TryFromIntError;
            fn try_from(n: usize) -> Result<$name, Self::Error> {
                <$inner>::try_from(n).map($name)
            }
        }
    };
}

typed_id! {
    /// Index of a student in the population.
    pub struct StudentId(u32);
}

typed_id! {
    /// Index of a cafeteria in the population.
    pub struct CafeteriaId(u32);
}

/// Address of any agent taking part in the negotiation.
///
/// The derived `Ord` is the fixed dispatch order used by the round loop:
/// the manager first, then students by ascending id, then cafeterias by
/// ascending id.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AgentId {
    Manager,
    Student(StudentId),
    Cafeteria(CafeteriaId),
}

impl AgentId {
    /// The student id, if this address names a student.
    #[inline]
    pub fn as_student(self) -> Option<StudentId> {
        match self {
            AgentId::Student(s) => Some(s),
            _ => None,
        }
    }

    /// The cafeteria id, if this address names a cafeteria.
    #[inline]
    pub fn as_cafeteria(self) -> Option<CafeteriaId> {
        match self {
            AgentId::Cafeteria(c) => Some(c),
            _ => None,
        }
    }
}

impl From<StudentId> for AgentId {
    fn from(id: StudentId) -> Self {
        AgentId::Student(id)
    }
}

impl From<CafeteriaId> for AgentId {
    fn from(id: CafeteriaId) -> Self {
        AgentId::Cafeteria(id)
    }
}

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AgentId::Manager      => write!(f, "Manager"),
            AgentId::Student(s)   => s.fmt(f),
            AgentId::Cafeteria(c) => c.fmt(f),
        }
    }
}
