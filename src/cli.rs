use crate::core::export::ExternalTarget;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Topic,
    Industry,
    Expertise,
    Story,
}

impl Field {
    pub fn label(self) -> &'static str {
        match self {
            Field::Topic => "Topic",
            Field::Industry => "Industry",
            Field::Expertise => "Expertise Areas (optional)",
            Field::Story => "Personal Story (optional)",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliCommand {
    Quit,
    Help,
    Form,
    SetField(Field, String),
    SetKey(String),
    Generate,
    Show,
    Edit,
    Download,
    Link(ExternalTarget),
    Unknown(String),
}

impl CliCommand {
    /// Commands whose line should stay out of the editor history.
    pub fn is_secret(&self) -> bool {
        matches!(self, CliCommand::SetKey(_))
    }
}

pub fn parse_input(line: &str) -> Option<CliCommand> {
    let trimmed = line.trim();

    if trimmed.is_empty() {
        return None;
    }

    match trimmed {
        "/q" | "/quit" | "exit" | "quit" => return Some(CliCommand::Quit),
        "/h" | "/help" | "help" => return Some(CliCommand::Help),
        _ => {}
    }

    let Some(rest) = trimmed.strip_prefix('/') else {
        return Some(CliCommand::Unknown(trimmed.to_string()));
    };

    let (name, arg) = match rest.split_once(char::is_whitespace) {
        Some((name, arg)) => (name, arg.trim().to_string()),
        None => (rest, String::new()),
    };

    let command = match name {
        "topic" => CliCommand::SetField(Field::Topic, arg),
        "industry" => CliCommand::SetField(Field::Industry, arg),
        "expertise" => CliCommand::SetField(Field::Expertise, arg),
        "story" => CliCommand::SetField(Field::Story, arg),
        "key" => CliCommand::SetKey(arg),
        "form" => CliCommand::Form,
        "generate" | "g" => CliCommand::Generate,
        "show" => CliCommand::Show,
        "edit" => CliCommand::Edit,
        "download" | "save" => CliCommand::Download,
        "grammar" => CliCommand::Link(ExternalTarget::GrammarCheck),
        "design" => CliCommand::Link(ExternalTarget::VisualDesign),
        _ => CliCommand::Unknown(trimmed.to_string()),
    };
    Some(command)
}

pub const HELP: &str = "\
How to use:
  1. Enter your OpenAI API key      /key <secret>
  2. Fill in your content details   /topic, /industry, /expertise, /story <text>
  3. Generate your post             /generate
  4. Edit and refine                /show, /edit
  5. Use additional tools           /grammar, /design, /download

Other: /form (review fields), /help, /quit";
