//! Disassembly Correlator.
//!
//! Loads an objdump-style listing and relates a fetch-stage program counter to it. It provides:
//! 1. **Parsing:** Lines starting with `<hex>:` are resolved; labels, comments and blank lines
//!    are kept but unresolved.
//! 2. **Lookup:** Exact-match search for an address.
//! 3. **Windowing:** A fixed-height view centred on the match and clamped to the listing.
//!
//! # Usage
//!
//! ```
//! use pipetrace_core::disasm::Listing;
//!
//! let listing = Listing::parse("  f8:\tnop\n 100:\taddi a0,a0,1\n 108:\tret\n");
//! let view = listing.window(0x100, 3);
//! assert_eq!(view.lines().len(), 3);
//! assert_eq!(view.highlighted().map(|l| l.address), Some(Some(0x100)));
//! ```

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::common::error::{AddressNotFound, Result, TraceError};

/// One line of the listing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DisassemblyLine {
    /// Address parsed from the line, or `None` for labels, comments and blank lines.
    pub address: Option<u32>,
    /// The line as it appears in the listing.
    pub text: String,
}

impl DisassemblyLine {
    /// Parses a single listing line. Never fails; unparsable prefixes leave the line unresolved.
    pub fn parse(line: &str) -> Self {
        let address = line.split_once(':').and_then(|(prefix, _)| {
            let prefix = prefix.trim();
            let digits = prefix
                .strip_prefix("0x")
                .or_else(|| prefix.strip_prefix("0X"))
                .unwrap_or(prefix);
            u32::from_str_radix(digits, 16).ok()
        });
        Self {
            address,
            text: line.to_owned(),
        }
    }
}

/// A static disassembly listing, in file order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Listing {
    lines: Vec<DisassemblyLine>,
}

/// A contiguous view of the listing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Window<'a> {
    /// Listing index of the first line in the view.
    pub start: usize,
    lines: &'a [DisassemblyLine],
    highlight: Option<usize>,
    miss: Option<AddressNotFound>,
}

impl<'a> Window<'a> {
    /// Lines in the view.
    pub const fn lines(&self) -> &'a [DisassemblyLine] {
        self.lines
    }

    /// Position of the matched line within [`Window::lines`], if the address resolved.
    pub const fn highlight(&self) -> Option<usize> {
        self.highlight
    }

    /// The matched line, if the address resolved.
    pub fn highlighted(&self) -> Option<&'a DisassemblyLine> {
        self.highlight.and_then(|idx| self.lines.get(idx))
    }

    /// The correlation miss, if the address had no exact match.
    pub const fn miss(&self) -> Option<AddressNotFound> {
        self.miss
    }
}

impl Listing {
    /// Parses listing text.
    pub fn parse(text: &str) -> Self {
        let lines: Vec<DisassemblyLine> = text.lines().map(DisassemblyLine::parse).collect();
        debug!(
            lines = lines.len(),
            resolved = lines.iter().filter(|l| l.address.is_some()).count(),
            "listing parsed"
        );
        Self { lines }
    }

    /// Reads and parses a listing file.
    ///
    /// # Errors
    ///
    /// [`TraceError::Io`] if the file cannot be read.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|source| TraceError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::parse(&text))
    }

    /// All lines.
    pub fn lines(&self) -> &[DisassemblyLine] {
        &self.lines
    }

    /// Number of lines.
    pub const fn len(&self) -> usize {
        self.lines.len()
    }

    /// Returns `true` for an empty listing.
    pub const fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Finds the first line whose resolved address equals `address`.
    ///
    /// # Errors
    ///
    /// [`AddressNotFound`] when no line resolves to exactly `address`.
    pub fn locate(&self, address: u32) -> std::result::Result<usize, AddressNotFound> {
        self.lines
            .iter()
            .position(|l| l.address == Some(address))
            .ok_or(AddressNotFound(address))
    }

    /// Index of the resolved line closest to `address`; the first such line on ties.
    fn nearest(&self, address: u32) -> Option<usize> {
        self.lines
            .iter()
            .enumerate()
            .filter_map(|(idx, l)| l.address.map(|a| (idx, a.abs_diff(address))))
            .min_by_key(|&(idx, dist)| (dist, idx))
            .map(|(idx, _)| idx)
    }

    /// Builds a `height`-line view around `address`.
    ///
    /// The match sits `floor((height - 1) / 2)` lines below the top of the view; near either
    /// end of the listing the view slides so it still holds `height` lines. A view is shorter
    /// than `height` only when the listing is. On a miss the view is anchored on the nearest
    /// resolved line (or the start of the listing) and nothing is highlighted.
    pub fn window(&self, address: u32, height: usize) -> Window<'_> {
        let (anchor, miss) = match self.locate(address) {
            Ok(idx) => (idx, None),
            Err(miss) => {
                debug!(%miss, "correlation miss");
                (self.nearest(address).unwrap_or(0), Some(miss))
            }
        };

        let above = height.saturating_sub(1) / 2;
        let end = (anchor.saturating_sub(above) + height).min(self.lines.len());
        let start = end.saturating_sub(height);
        let lines = &self.lines[start..end];

        let highlight = if miss.is_none() && (start..end).contains(&anchor) {
            Some(anchor - start)
        } else {
            None
        };

        Window {
            start,
            lines,
            highlight,
            miss,
        }
    }
}
