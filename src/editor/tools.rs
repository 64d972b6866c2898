/// A capability plugged into the rich-text widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tool {
    Embed,
    Table,
    List,
    Warning,
    Code,
    LinkTool,
    Image,
    Raw,
    Header,
    Quote,
    Checklist,
    Delimiter,
    InlineCode,
    SimpleImage,
}

impl Tool {
    /// Key the widget uses for this tool, which is also the block `type`.
    pub fn name(self) -> &'static str {
        match self {
            Tool::Embed => "embed",
            Tool::Table => "table",
            Tool::List => "list",
            Tool::Warning => "warning",
            Tool::Code => "code",
            Tool::LinkTool => "linkTool",
            Tool::Image => "image",
            Tool::Raw => "raw",
            Tool::Header => "header",
            Tool::Quote => "quote",
            Tool::Checklist => "checklist",
            Tool::Delimiter => "delimiter",
            Tool::InlineCode => "inlineCode",
            Tool::SimpleImage => "simpleImage",
        }
    }
}

/// The set of tools registered with an editor instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolRegistry {
    tools: Vec<Tool>,
}

impl ToolRegistry {
    /// The fixed capability set of the article editor page.
    pub fn standard() -> Self {
        Self {
            tools: vec![
                Tool::Embed,
                Tool::Table,
                Tool::List,
                Tool::Warning,
                Tool::Code,
                Tool::LinkTool,
                Tool::Image,
                Tool::Raw,
                Tool::Header,
                Tool::Quote,
                Tool::Checklist,
                Tool::Delimiter,
                Tool::InlineCode,
                Tool::SimpleImage,
            ],
        }
    }

    pub fn find(&self, name: &str) -> Option<Tool> {
        self.tools.iter().copied().find(|t| t.name() == name)
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.tools.iter().map(|t| t.name())
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::standard()
    }
}
