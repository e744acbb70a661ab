// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

//! Error type shared by the registry, the contexts and every codec.
//!
//! Every constructor is `#[cold]` and `#[track_caller]`; new variants get
//! one too.

use std::borrow::Cow;

use thiserror::Error;

/// Compile-time switch: build with `SKYCODEC_PANIC_ON_ERROR=1` to panic where
/// an error is created instead of returning it.
pub const PANIC_ON_ERROR: bool = option_env!("SKYCODEC_PANIC_ON_ERROR").is_some();

#[inline(always)]
pub const fn should_panic_on_error() -> bool {
    PANIC_ON_ERROR
}

/// Error type for registry construction and (de)serialization.
///
/// Do not build variants directly; use the constructor functions
/// ([`Error::duplicate_registration`], [`Error::framing`], ...) so that
/// `SKYCODEC_PANIC_ON_ERROR` can point at the creation site.
///
/// ```bash
/// RUST_BACKTRACE=1 SKYCODEC_PANIC_ON_ERROR=1 cargo test
/// ```
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// Two codecs claim the same type when the registry is frozen.
    #[error("duplicate codec registration for `{type_name}`: {first} conflicts with {second}")]
    DuplicateRegistration {
        type_name: Cow<'static, str>,
        first: Cow<'static, str>,
        second: Cow<'static, str>,
    },

    /// `register` was called on a frozen registry.
    #[error("codec registry is frozen, cannot register contributor `{0}`")]
    AlreadyFrozen(Cow<'static, str>),

    /// No codec is bound to the requested type or tag.
    #[error("{0}")]
    UnknownType(Cow<'static, str>),

    /// The stream framing is inconsistent: a back-reference points at a
    /// sequence number that was never recorded, a marker byte is unknown, or
    /// the decoder consumed a different number of bytes than were written.
    #[error("framing error: {0}")]
    Framing(Cow<'static, str>),

    /// A read ran past the end of the source: `offset + length > capacity`.
    #[error("buffer out of bound: {0} + {1} > {2}")]
    BufferOutOfBound(usize, usize, usize),

    /// Malformed payload bytes.
    #[error("{0}")]
    InvalidData(Cow<'static, str>),

    /// A codec received a value of a type it does not encode.
    #[error("type mismatch: codec for `{expected}` received `{actual}`")]
    TypeMismatch {
        expected: Cow<'static, str>,
        actual: Cow<'static, str>,
    },

    /// Nesting depth limit exceeded.
    #[error("{0}")]
    DepthExceed(Cow<'static, str>),

    /// Operation not allowed in the current state.
    #[error("{0}")]
    NotAllowed(Cow<'static, str>),
}

macro_rules! check_panic {
    ($err:expr) => {{
        let err = $err;
        if PANIC_ON_ERROR {
            panic!("SKYCODEC_PANIC_ON_ERROR: {}", err);
        }
        err
    }};
}

impl Error {
    /// Creates a new [`Error::DuplicateRegistration`].
    ///
    /// ```
    /// use skycodec_core::error::Error;
    ///
    /// let err = Error::duplicate_registration("alloc::string::String", "StringCodec", "OtherCodec");
    /// assert!(err.to_string().contains("StringCodec"));
    /// ```
    #[inline(always)]
    #[cold]
    #[track_caller]
    pub fn duplicate_registration<A, B, C>(type_name: A, first: B, second: C) -> Self
    where
        A: Into<Cow<'static, str>>,
        B: Into<Cow<'static, str>>,
        C: Into<Cow<'static, str>>,
    {
        check_panic!(Error::DuplicateRegistration {
            type_name: type_name.into(),
            first: first.into(),
            second: second.into(),
        })
    }

    #[inline(always)]
    #[cold]
    #[track_caller]
    pub fn already_frozen<S: Into<Cow<'static, str>>>(contributor: S) -> Self {
        check_panic!(Error::AlreadyFrozen(contributor.into()))
    }

    #[inline(always)]
    #[cold]
    #[track_caller]
    pub fn unknown_type<S: Into<Cow<'static, str>>>(s: S) -> Self {
        check_panic!(Error::UnknownType(s.into()))
    }

    /// Creates a new [`Error::Framing`].
    ///
    /// ```
    /// use skycodec_core::error::Error;
    ///
    /// let err = Error::framing(format!("back-reference {} was never recorded", 7));
    /// assert!(matches!(err, Error::Framing(_)));
    /// ```
    #[inline(always)]
    #[cold]
    #[track_caller]
    pub fn framing<S: Into<Cow<'static, str>>>(s: S) -> Self {
        check_panic!(Error::Framing(s.into()))
    }

    #[inline(always)]
    #[cold]
    #[track_caller]
    pub fn buffer_out_of_bound(offset: usize, length: usize, capacity: usize) -> Self {
        check_panic!(Error::BufferOutOfBound(offset, length, capacity))
    }

    #[inline(always)]
    #[cold]
    #[track_caller]
    pub fn invalid_data<S: Into<Cow<'static, str>>>(s: S) -> Self {
        check_panic!(Error::InvalidData(s.into()))
    }

    #[inline(always)]
    #[cold]
    #[track_caller]
    pub fn type_mismatch<A, B>(expected: A, actual: B) -> Self
    where
        A: Into<Cow<'static, str>>,
        B: Into<Cow<'static, str>>,
    {
        check_panic!(Error::TypeMismatch {
            expected: expected.into(),
            actual: actual.into(),
        })
    }

    #[inline(always)]
    #[cold]
    #[track_caller]
    pub fn depth_exceed<S: Into<Cow<'static, str>>>(s: S) -> Self {
        check_panic!(Error::DepthExceed(s.into()))
    }

    #[inline(always)]
    #[cold]
    #[track_caller]
    pub fn not_allowed<S: Into<Cow<'static, str>>>(s: S) -> Self {
        check_panic!(Error::NotAllowed(s.into()))
    }

    /// Appends the Rust type name to an [`Error::UnknownType`] message.
    #[inline(never)]
    pub fn enhance_unknown_type<T: ?Sized + 'static>(err: Error) -> Error {
        if let Error::UnknownType(s) = err {
            Error::UnknownType(format!("{s} (type: {})", std::any::type_name::<T>()).into())
        } else {
            err
        }
    }
}

/// Ensures a condition holds; otherwise returns early with the given error,
/// or with an [`Error::InvalidData`] built from a message.
///
/// ```
/// use skycodec_core::ensure;
/// use skycodec_core::error::Error;
///
/// fn check_len(n: usize) -> Result<(), Error> {
///     ensure!(n > 0, "length must be positive");
///     ensure!(n < 10, "length {} too large", n);
///     Ok(())
/// }
/// assert!(check_len(3).is_ok());
/// assert!(check_len(12).is_err());
/// ```
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $msg:literal) => {
        if !$cond {
            return Err($crate::error::Error::invalid_data($msg));
        }
    };
    ($cond:expr, $err:expr) => {
        if !$cond {
            return Err($err);
        }
    };
    ($cond:expr, $fmt:expr, $($arg:tt)*) => {
        if !$cond {
            return Err($crate::error::Error::invalid_data(format!($fmt, $($arg)*)));
        }
    };
}
