// SPDX-License-Identifier: LGPL-3.0-or-later OR MPL-2.0
// This file is a part of `facet`.
//
// `facet` is free software: you can redistribute it and/or modify it under the terms of
// either:
//
// * GNU Lesser General Public License as published by the Free Software Foundation, either
// version 3 of the License, or (at your option) any later version.
// * Mozilla Public License as published by the Mozilla Foundation, version 2.
//
// `facet` is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.
// See the GNU Lesser General Public License or the Mozilla Public License for more details.
//
// You should have received a copy of the GNU Lesser General Public License and the Mozilla
// Public License along with `facet`. If not, see <https://www.gnu.org/licenses/>.

//! The error type shared across the renderer.

use crate::gpu_backend::StageKind;

use std::error::Error as StdError;
use std::fmt;
use std::io;

/// Errors produced while building or driving a scene.
///
/// There is no retry path anywhere: a compile or link failure is fatal to the
/// rendering pipeline that hit it, and the caller decides whether the
/// application keeps running without rendering.
#[derive(Debug)]
pub enum Error {
    /// The device does not expose the graphics API level the renderer needs.
    ///
    /// Hosts are expected to report this to the user and keep running with
    /// rendering disabled.
    Unsupported(String),

    /// A shader stage failed to compile; carries the compiler's log.
    Compile {
        /// Which stage refused to compile.
        stage: StageKind,
        /// The compiler's diagnostic log, verbatim.
        log: String,
    },

    /// The program failed to link; carries the linker's log.
    Link {
        /// The linker's diagnostic log, verbatim.
        log: String,
    },

    /// A uniform named by the pipeline configuration is not active in the
    /// linked program.
    MissingUniform(&'static str),

    /// An attribute named by the vertex layout is not active in the linked
    /// program.
    MissingAttribute(&'static str),

    /// A shader source id is not in the catalog.
    UnknownSource(String),

    /// Reading a shader source from disk failed.
    Io(io::Error),

    /// A lifecycle callback arrived before `surface_created` succeeded.
    NotReady,

    /// The backend reported an allocation or device error.
    Backend(Box<dyn StdError + 'static>),
}

impl Error {
    pub(crate) fn backend(error: impl StdError + 'static) -> Self {
        Error::Backend(Box::new(error))
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Unsupported(what) => write!(f, "unsupported device: {what}"),
            Error::Compile { stage, log } => {
                write!(f, "failed to compile {stage} shader: {log}")
            }
            Error::Link { log } => write!(f, "failed to link program: {log}"),
            Error::MissingUniform(name) => {
                write!(f, "uniform `{name}` is not active in the linked program")
            }
            Error::MissingAttribute(name) => {
                write!(f, "attribute `{name}` is not active in the linked program")
            }
            Error::UnknownSource(id) => write!(f, "no shader source with id `{id}`"),
            Error::Io(err) => write!(f, "failed to read shader source: {err}"),
            Error::NotReady => write!(f, "surface lifecycle used before surface_created"),
            Error::Backend(err) => write!(f, "backend error: {err}"),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Error::Io(err) => Some(err),
            Error::Backend(err) => Some(&**err),
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Error::Io(err)
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
