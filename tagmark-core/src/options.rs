/// Rendering options shared by every output format.
///
/// Use [`RenderOptions::builder()`] to construct an instance. This struct is
/// marked `#[non_exhaustive]` to allow adding new fields in future minor versions.
///
/// # Example
///
/// ```
/// use tagmark_core::RenderOptions;
///
/// let options = RenderOptions::builder()
///     .force_rel_nofollow(false)
///     .line_numbers(true)
///     .build();
/// assert!(!options.force_rel_nofollow());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub struct RenderOptions {
    force_rel_nofollow: bool,
    line_numbers: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        RenderOptionsBuilder::default().build()
    }
}

impl RenderOptions {
    /// Create a new builder with default values.
    #[must_use]
    pub fn builder() -> RenderOptionsBuilder {
        RenderOptionsBuilder::default()
    }

    /// Whether outgoing links get `rel="nofollow"` no matter what the markup says.
    #[must_use]
    pub fn force_rel_nofollow(&self) -> bool {
        self.force_rel_nofollow
    }

    /// Whether code listings are rendered with line numbers.
    #[must_use]
    pub fn line_numbers(&self) -> bool {
        self.line_numbers
    }
}

/// Builder for [`RenderOptions`].
///
/// Use [`RenderOptions::builder()`] to create a new builder.
#[derive(Debug, Clone, Copy)]
pub struct RenderOptionsBuilder {
    force_rel_nofollow: bool,
    line_numbers: bool,
}

impl Default for RenderOptionsBuilder {
    fn default() -> Self {
        Self {
            force_rel_nofollow: true,
            line_numbers: true,
        }
    }
}

impl RenderOptionsBuilder {
    /// Mark every outgoing link as non-indexable.
    #[must_use]
    pub fn force_rel_nofollow(mut self, force: bool) -> Self {
        self.force_rel_nofollow = force;
        self
    }

    /// Enable or disable line numbers in code listings.
    #[must_use]
    pub fn line_numbers(mut self, line_numbers: bool) -> Self {
        self.line_numbers = line_numbers;
        self
    }

    /// Build the [`RenderOptions`] instance.
    #[must_use]
    pub fn build(self) -> RenderOptions {
        RenderOptions {
            force_rel_nofollow: self.force_rel_nofollow,
            line_numbers: self.line_numbers,
        }
    }
}
