use clap::{Args, Parser, Subcommand};

#[derive(Clone, Debug, Eq, Parser, PartialEq)]
#[command(version, about = "Tabla notation notes client")]
pub struct CliConfig {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Clone, Debug, Eq, PartialEq, Subcommand)]
pub enum Command {
    /// Checks that the notes service answers.
    Ping,
    /// Lists notes, optionally only one taal.
    List {
        #[arg(long)]
        taal: Option<String>,
    },
    /// Prints one note with its full content.
    Show { id: String },
    /// Creates a note.
    Add(AddArgs),
    /// Changes fields of an owned note.
    Edit {
        id: String,
        #[command(flatten)]
        fields: EditArgs,
    },
    /// Deletes an owned note.
    Delete { id: String },
    /// Signs in and remembers the session on this device.
    Login { username: String, password: String },
    /// Creates an account and signs in.
    Register { username: String, password: String },
    /// Forgets the remembered session.
    Logout,
}

#[derive(Args, Clone, Debug, Eq, PartialEq)]
pub struct AddArgs {
    #[arg(long)]
    pub title: String,

    #[arg(long, default_value = "")]
    pub taal: String,

    /// theka, peshkar, kaida, rela, mukhda, chakradhar or any other label.
    #[arg(long)]
    pub structure: String,

    #[arg(long, conflicts_with_all = ["main", "tehai", "bal"])]
    pub content: Option<String>,

    #[arg(long)]
    pub main: Option<String>,

    #[arg(long)]
    pub tehai: Option<String>,

    /// One bal; repeat for several, in order.
    #[arg(long)]
    pub bal: Vec<String>,
}

#[derive(Args, Clone, Debug, Default, Eq, PartialEq)]
pub struct EditArgs {
    #[arg(long)]
    pub title: Option<String>,

    #[arg(long)]
    pub taal: Option<String>,

    #[arg(long)]
    pub structure: Option<String>,

    #[arg(long, conflicts_with_all = ["main", "tehai", "bal", "clear_bals"])]
    pub content: Option<String>,

    #[arg(long)]
    pub main: Option<String>,

    #[arg(long)]
    pub tehai: Option<String>,

    /// Replaces all bals; repeat for several, in order.
    #[arg(long)]
    pub bal: Vec<String>,

    #[arg(long, default_value_t = false, conflicts_with = "bal")]
    pub clear_bals: bool,
}
