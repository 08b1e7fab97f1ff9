use std::ffi::{c_char, CString};

/// Command-line arguments, decoded to UTF-8.
///
/// Also keeps a NUL-terminated copy of every argument so C-style consumers can
/// get an `argv` array whose pointers stay valid as long as this value lives.
#[derive(Debug, Clone, Default)]
pub struct CmdLine {
    arguments: Vec<String>,
    c_strings: Vec<CString>,
}

impl CmdLine {
    /// Arguments of the current process. Non-UTF-8 arguments are decoded lossily.
    pub fn from_env() -> Self {
        Self::from_args(
            std::env::args_os().map(|a| a.to_string_lossy().into_owned()),
        )
    }

    pub fn from_args<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let arguments: Vec<String> = args.into_iter().map(Into::into).collect();
        let c_strings = arguments.iter().map(|a| to_c_string(a)).collect();
        Self { arguments, c_strings }
    }

    /// Decodes UTF-16 wide arguments. Unpaired surrogates become U+FFFD and a
    /// trailing NUL terminator is dropped.
    pub fn from_utf16(args: &[&[u16]]) -> Self {
        Self::from_args(
            args.iter()
                .map(|a| String::from_utf16_lossy(strip_nul(a))),
        )
    }

    /// Decodes UTF-32 wide arguments. Invalid scalar values become U+FFFD and a
    /// trailing NUL terminator is dropped.
    pub fn from_utf32(args: &[&[u32]]) -> Self {
        Self::from_args(args.iter().map(|a| {
            strip_nul(a)
                .iter()
                .map(|&u| char::from_u32(u).unwrap_or(char::REPLACEMENT_CHARACTER))
                .collect::<String>()
        }))
    }

    pub fn arguments(&self) -> &[String] {
        &self.arguments
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.arguments.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.arguments.is_empty()
    }

    /// Pointers to NUL-terminated copies of the arguments, borrowed from
    /// `self`. An argument with an interior NUL is cut at that NUL.
    pub fn c_argv(&self) -> Vec<*const c_char> {
        self.c_strings.iter().map(|c| c.as_ptr()).collect()
    }
}

fn strip_nul<T: Copy + Default + PartialEq>(units: &[T]) -> &[T] {
    let zero = T::default();
    match units.iter().position(|&u| u == zero) {
        Some(end) => &units[..end],
        None => units,
    }
}

fn to_c_string(arg: &str) -> CString {
    let bytes = arg.as_bytes();
    let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
    // No NUL remains in `bytes[..end]`.
    CString::new(&bytes[..end]).unwrap_or_default()
}
