use anyhow::Result;
use premium_rank::commands::{Dispatcher, PlayerDirectory};
use premium_rank::completion::PremiumHelper;
use premium_rank::database::RankStore;
use premium_rank::session::Session;
use rustyline::error::ReadlineError;
use rustyline::{history::DefaultHistory, CompletionType, Config, Editor};
use std::sync::Arc;
use tracing::debug;

/// Command label shown in usage text.
pub const LABEL: &str = "premium";

pub struct Cli {
    store: Arc<RankStore>,
    players: Arc<dyn PlayerDirectory + Send + Sync>,
    session: Arc<Session>,
    editor: Editor<PremiumHelper, DefaultHistory>,
}

impl Cli {
    pub fn new(
        store: Arc<RankStore>,
        players: Arc<dyn PlayerDirectory + Send + Sync>,
        session: Arc<Session>,
    ) -> Result<Self> {
        let config = Config::builder()
            .completion_type(CompletionType::List)
            .auto_add_history(true)
            .edit_mode(rustyline::EditMode::Emacs)
            .build();

        let mut editor = Editor::with_config(config)?;
        let helper = PremiumHelper::new(store.clone(), players.clone(), session.clone());
        editor.set_helper(Some(helper));

        Ok(Self {
            store,
            players,
            session,
            editor,
        })
    }

    pub fn run(&mut self) -> Result<()> {
        println!("Premium rank console. Backend: {}", self.store.kind());
        match self.store.server_version() {
            Some(version) => println!("Server version: {}", version),
            None => println!("Not connected; every lookup will come back empty."),
        }
        println!("Acting as: {}", self.session.name());
        println!();
        println!("Type '\\h' for help. Press Tab to complete commands.");
        println!();

        loop {
            let prompt = self.get_prompt();

            let readline = self.editor.readline(&prompt);
            match readline {
                Ok(line) => {
                    let line = line.trim();
                    if line.is_empty() {
                        continue;
                    }

                    if line.starts_with('\\') {
                        if !self.handle_special_command(line) {
                            break;
                        }
                        continue;
                    }

                    println!("{}", self.execute(line));
                }
                Err(ReadlineError::Interrupted) => {
                    println!("^C");
                    continue;
                }
                Err(ReadlineError::Eof) => {
                    println!("Bye");
                    break;
                }
                Err(err) => {
                    println!("Error: {:?}", err);
                    break;
                }
            }
        }
        Ok(())
    }

    /// Runs one command line and returns the rendered response.
    pub fn execute(&self, line: &str) -> String {
        let mut args: Vec<&str> = line.split_whitespace().collect();
        // Accept the command written out in full, as in game chat
        if args
            .first()
            .is_some_and(|first| first.trim_start_matches('/').eq_ignore_ascii_case(LABEL))
        {
            args.remove(0);
        }
        debug!(?args, actor = self.session.name(), "executing console command");

        Dispatcher::new(&self.store, self.players.as_ref())
            .dispatch(self.session.as_ref(), LABEL, &args)
            .to_string()
    }

    fn get_prompt(&self) -> String {
        format!("{} [{}]> ", self.store.kind(), self.session.name())
    }

    /// Returns `false` when the console should exit.
    fn handle_special_command(&self, command: &str) -> bool {
        match command {
            "\\q" | "\\quit" | "\\exit" => {
                println!("Bye");
                return false;
            }
            "\\h" | "\\help" => self.show_help(),
            "\\s" | "\\status" => self.show_status(),
            _ => {
                println!("Unknown command: {}", command);
                println!("Type '\\h' for help.");
            }
        }
        true
    }

    fn show_help(&self) {
        println!("{}", self.execute(""));
        println!();
        println!("\\h (\\help)      Display this help.");
        println!("\\s (\\status)    Show backend and session information.");
        println!("\\q (\\quit)      Quit.");
        println!();
    }

    fn show_status(&self) {
        println!("--------------");
        println!("Backend:\t\t{}", self.store.kind());
        println!(
            "Connected:\t\t{}",
            if self.store.is_connected() { "yes" } else { "no" }
        );
        println!(
            "Server version:\t\t{}",
            self.store.server_version().as_deref().unwrap_or("(none)")
        );
        println!("Acting as:\t\t{}", self.session.name());
        println!("Online players:\t\t{}", self.players.online_names().join(", "));
        println!(
            "Rank types:\t\t{}",
            self.store.list_available_rank_types().join(", ")
        );
        println!("--------------");
    }
}
