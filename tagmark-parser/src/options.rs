use url::Url;

/// Default bound on simultaneously open tags.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Default bound on the number of nodes in one document.
pub const DEFAULT_MAX_NODES: usize = 100_000;

#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct Options {
    /// Maximum number of tags open at the same time.
    pub max_depth: usize,
    /// Maximum number of nodes, root and synthesized nodes included.
    pub max_nodes: usize,
    /// Wrap runs of top-level inline content in paragraphs.
    pub paragraphs: bool,
    /// Base against which tags resolve relative URLs during sanitizing.
    pub relative_url_base: Option<Url>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            max_nodes: DEFAULT_MAX_NODES,
            paragraphs: false,
            relative_url_base: None,
        }
    }
}

impl Options {
    /// Create a new `OptionsBuilder` for fluent configuration.
    ///
    /// # Example
    ///
    /// ```
    /// use tagmark_parser::Options;
    ///
    /// let options = Options::builder()
    ///     .with_max_depth(16)
    ///     .with_paragraphs()
    ///     .build();
    /// assert_eq!(options.max_depth, 16);
    /// ```
    #[must_use]
    pub fn builder() -> OptionsBuilder {
        OptionsBuilder::default()
    }

    /// Create a new `Options` with default settings.
    ///
    /// Equivalent to `Options::default()`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

/// Builder for `Options`.
///
/// Create an `OptionsBuilder` using `Options::builder()`.
#[derive(Debug, Clone, Default)]
#[non_exhaustive]
pub struct OptionsBuilder {
    options: Options,
}

impl OptionsBuilder {
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.options.max_depth = max_depth;
        self
    }

    #[must_use]
    pub fn with_max_nodes(mut self, max_nodes: usize) -> Self {
        self.options.max_nodes = max_nodes;
        self
    }

    /// Wrap top-level inline content in paragraphs.
    #[must_use]
    pub fn with_paragraphs(mut self) -> Self {
        self.options.paragraphs = true;
        self
    }

    /// Resolve relative URLs against `base`.
    ///
    /// # Example
    ///
    /// ```
    /// use tagmark_parser::Options;
    /// use url::Url;
    ///
    /// let base = Url::parse("https://example.com/forum/").unwrap();
    /// let options = Options::builder().with_relative_url_base(base).build();
    /// assert!(options.relative_url_base.is_some());
    /// ```
    #[must_use]
    pub fn with_relative_url_base(mut self, base: Url) -> Self {
        self.options.relative_url_base = Some(base);
        self
    }

    #[must_use]
    pub fn build(self) -> Options {
        self.options
    }
}
