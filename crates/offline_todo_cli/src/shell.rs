//! Line-oriented front end for a todo session.
//!
//! # Responsibility
//! - Render the login form, the todo list and inline errors as text.
//! - Map typed commands onto session operations.
//!
//! # Invariants
//! - Every core error is printed inline; none ends the shell.
//! - The connectivity monitor is mounted once per run and torn down on exit.

use log::info;
use offline_todo_core::{
    AuthState, ConnectivityMonitor, ErrorKind, KeyValueStore, ManualConnectivity, SubmitOutcome,
    TodoId, TodoSession,
};
use std::io::{self, BufRead, Write};

const HELP: &str = "\
Commands:
  add <text>         add a todo
  toggle <n>         flip completion of todo n
  edit <n> [text]    replace the text of todo n (prompts when text is omitted)
  rm <n>             delete todo n after confirmation
  ls                 list todos
  passwd             change the password
  logout             lock the list
  offline | online   simulate a connectivity change
  help               show this help
  quit               exit";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

#[derive(Debug, PartialEq, Eq)]
enum Command<'a> {
    Add(&'a str),
    Toggle(&'a str),
    Edit(&'a str, Option<&'a str>),
    Remove(&'a str),
    List,
    Passwd,
    Logout,
    Online(bool),
    Help,
    Quit,
    Empty,
    Unknown(&'a str),
}

fn parse_command(line: &str) -> Command<'_> {
    let line = line.trim();
    let (head, rest) = match line.split_once(char::is_whitespace) {
        Some((head, rest)) => (head, rest.trim()),
        None => (line, ""),
    };

    match head {
        "" => Command::Empty,
        "add" | "a" => Command::Add(rest),
        "toggle" | "t" | "done" => Command::Toggle(rest),
        "edit" | "e" => match rest.split_once(char::is_whitespace) {
            Some((target, text)) => Command::Edit(target, Some(text)),
            None => Command::Edit(rest, None),
        },
        "rm" | "remove" | "delete" => Command::Remove(rest),
        "ls" | "list" => Command::List,
        "passwd" | "password" => Command::Passwd,
        "logout" => Command::Logout,
        "offline" => Command::Online(false),
        "online" => Command::Online(true),
        "help" | "?" => Command::Help,
        "quit" | "exit" | "q" => Command::Quit,
        other => Command::Unknown(other),
    }
}

/// Interactive shell over one session, reading `input` and writing `output`.
pub struct Shell<S, R, W>
where
    S: KeyValueStore + Clone,
{
    session: TodoSession<S>,
    platform: ManualConnectivity,
    monitor: ConnectivityMonitor,
    input: R,
    output: W,
}

impl<S, R, W> Shell<S, R, W>
where
    S: KeyValueStore + Clone,
    R: BufRead,
    W: Write,
{
    pub fn new(session: TodoSession<S>, platform: ManualConnectivity, input: R, output: W) -> Self {
        Self {
            session,
            platform,
            monitor: ConnectivityMonitor::new(),
            input,
            output,
        }
    }

    /// Runs until `quit` or end of input.
    pub fn run(&mut self) -> io::Result<()> {
        if let Err(err) = self.session.start() {
            writeln!(self.output, "error: {err}")?;
            return Ok(());
        }
        self.monitor.mount(&mut self.platform);
        writeln!(self.output, "Todo")?;
        info!("event=shell_start module=cli status=ok");

        let result = self.event_loop();

        self.monitor.teardown(&mut self.platform);
        info!("event=shell_stop module=cli status=ok");
        result
    }

    fn event_loop(&mut self) -> io::Result<()> {
        loop {
            let flow = match self.session.state() {
                AuthState::Authenticated => self.command_step()?,
                _ => self.login_step()?,
            };
            if flow == Flow::Quit {
                return Ok(());
            }
        }
    }

    fn login_step(&mut self) -> io::Result<Flow> {
        self.print_banner()?;
        let new_user = *self.session.state() == AuthState::NewUser;
        if new_user {
            writeln!(self.output, "Create Password")?;
        } else {
            writeln!(self.output, "Enter Password")?;
            if let Some(failure) = self.session.gate().login_error() {
                writeln!(self.output, "{failure}")?;
            }
        }

        let prompt = if new_user {
            "Create a password: "
        } else {
            "Enter your password: "
        };
        let Some(password) = self.prompt(prompt)? else {
            return Ok(Flow::Quit);
        };

        match self.session.submit_password(&password) {
            Ok(SubmitOutcome::PasswordCreated) => {
                writeln!(self.output, "Password set.")?;
                self.print_list()?;
            }
            Ok(SubmitOutcome::LoggedIn) => self.print_list()?,
            // Login failures are rendered from the gate state on the next step.
            Err(err) if err.kind() == ErrorKind::Auth => {}
            Err(err) => writeln!(self.output, "{err}")?,
        }
        Ok(Flow::Continue)
    }

    fn command_step(&mut self) -> io::Result<Flow> {
        self.print_banner()?;
        let Some(line) = self.prompt("> ")? else {
            return Ok(Flow::Quit);
        };

        match parse_command(&line) {
            Command::Add(text) => self.add(text)?,
            Command::Toggle(target) => self.toggle(target)?,
            Command::Edit(target, text) => self.edit(target, text)?,
            Command::Remove(target) => self.remove(target)?,
            Command::List => self.print_list()?,
            Command::Passwd => self.change_password()?,
            Command::Logout => {
                if let Err(err) = self.session.logout() {
                    writeln!(self.output, "{err}")?;
                }
            }
            Command::Online(online) => self.platform.set_online(online),
            Command::Help => writeln!(self.output, "{HELP}")?,
            Command::Quit => return Ok(Flow::Quit),
            Command::Empty => {}
            Command::Unknown(other) => {
                writeln!(self.output, "unknown command `{other}`; try `help`")?
            }
        }
        Ok(Flow::Continue)
    }

    fn add(&mut self, text: &str) -> io::Result<()> {
        let result = match self.session.todos_mut() {
            Ok(todos) => todos.add(text).map(|_| ()).map_err(|err| err.to_string()),
            Err(err) => Err(err.to_string()),
        };
        match result {
            Ok(()) => self.print_list(),
            Err(message) => writeln!(self.output, "{message}"),
        }
    }

    fn toggle(&mut self, target: &str) -> io::Result<()> {
        let Some(id) = self.resolve(target)? else {
            return Ok(());
        };
        let result = match self.session.todos_mut() {
            Ok(todos) => todos.toggle(id).map(|_| ()).map_err(|err| err.to_string()),
            Err(err) => Err(err.to_string()),
        };
        match result {
            Ok(()) => self.print_list(),
            Err(message) => writeln!(self.output, "{message}"),
        }
    }

    fn edit(&mut self, target: &str, text: Option<&str>) -> io::Result<()> {
        let Some(id) = self.resolve(target)? else {
            return Ok(());
        };
        let text = match text {
            Some(text) => text.to_string(),
            None => match self.prompt("New text (blank to cancel): ")? {
                Some(text) if !text.trim().is_empty() => text,
                _ => {
                    writeln!(self.output, "Edit cancelled.")?;
                    return Ok(());
                }
            },
        };

        let result = match self.session.todos_mut() {
            Ok(todos) => todos.edit(id, &text).map(|_| ()).map_err(|err| err.to_string()),
            Err(err) => Err(err.to_string()),
        };
        match result {
            Ok(()) => self.print_list(),
            Err(message) => writeln!(self.output, "{message}"),
        }
    }

    fn remove(&mut self, target: &str) -> io::Result<()> {
        let Some(id) = self.resolve(target)? else {
            return Ok(());
        };
        let text = self
            .session
            .todos()
            .and_then(|todos| todos.get(id))
            .map(|todo| todo.text.clone())
            .unwrap_or_default();
        writeln!(self.output, "Are you sure you want to delete this todo?")?;
        writeln!(self.output, "  {text}")?;
        let confirmed = matches!(
            self.prompt("Delete? [y/N] ")?.as_deref().map(str::trim),
            Some("y" | "Y" | "yes")
        );
        if !confirmed {
            return Ok(());
        }

        let result = match self.session.todos_mut() {
            Ok(todos) => todos.remove(id).map_err(|err| err.to_string()),
            Err(err) => Err(err.to_string()),
        };
        match result {
            Ok(Some(_)) => writeln!(self.output, "Todo deleted successfully"),
            Ok(None) => Ok(()),
            Err(message) => writeln!(self.output, "{message}"),
        }
    }

    fn change_password(&mut self) -> io::Result<()> {
        writeln!(self.output, "Change Password")?;
        let current = match self.prompt("Current password (blank to cancel): ")? {
            Some(current) if !current.is_empty() => current,
            _ => {
                writeln!(self.output, "Password change cancelled.")?;
                return Ok(());
            }
        };
        let Some(next) = self.prompt("New password: ")? else {
            return Ok(());
        };

        match self.session.change_password(&current, &next) {
            Ok(()) => writeln!(self.output, "Password changed successfully"),
            Err(err) => writeln!(self.output, "{err}"),
        }
    }

    /// Maps a 1-based list position to a todo id, printing why it failed.
    fn resolve(&mut self, target: &str) -> io::Result<Option<TodoId>> {
        let id = target
            .parse::<usize>()
            .ok()
            .and_then(|position| position.checked_sub(1))
            .and_then(|index| {
                self.session
                    .todos()
                    .and_then(|todos| todos.todos().get(index))
                    .map(|todo| todo.id)
            });
        if id.is_none() {
            writeln!(self.output, "no todo at position `{target}`")?;
        }
        Ok(id)
    }

    fn print_list(&mut self) -> io::Result<()> {
        let Some(todos) = self.session.todos() else {
            return Ok(());
        };
        writeln!(self.output, "Your Todos")?;
        if todos.is_empty() {
            writeln!(self.output, "  (nothing yet)")?;
        }
        for (index, todo) in todos.todos().iter().enumerate() {
            let mark = if todo.completed { 'x' } else { ' ' };
            writeln!(self.output, "  {}. [{mark}] {}", index + 1, todo.text)?;
        }
        Ok(())
    }

    fn print_banner(&mut self) -> io::Result<()> {
        if let Some(banner) = self.monitor.banner() {
            writeln!(self.output, "! {banner}")?;
        }
        Ok(())
    }

    fn prompt(&mut self, prompt: &str) -> io::Result<Option<String>> {
        write!(self.output, "{prompt}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        let trimmed_len = line.trim_end_matches(['\n', '\r']).len();
        line.truncate(trimmed_len);
        Ok(Some(line))
    }
}

#[cfg(test)]
mod tests {
    use super::{parse_command, Command, Shell};
    use offline_todo_core::{
        KeyValueStore, ManualConnectivity, MemoryKvStore, TodoSession, PASSWORD_KEY, TODOS_KEY,
    };
    use std::io::Cursor;

    fn run_script(kv: &MemoryKvStore, online: bool, script: &str) -> String {
        let mut output = Vec::new();
        {
            let session = TodoSession::new(kv);
            let mut shell = Shell::new(
                session,
                ManualConnectivity::new(online),
                Cursor::new(script.as_bytes()),
                &mut output,
            );
            shell.run().unwrap();
        }
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn parse_command_splits_head_and_arguments() {
        assert_eq!(parse_command("  add  Buy milk "), Command::Add("Buy milk"));
        assert_eq!(
            parse_command("edit 2 Walk the dog"),
            Command::Edit("2", Some("Walk the dog"))
        );
        assert_eq!(parse_command("edit 2"), Command::Edit("2", None));
        assert_eq!(parse_command("offline"), Command::Online(false));
        assert_eq!(parse_command(""), Command::Empty);
        assert_eq!(parse_command("frobnicate"), Command::Unknown("frobnicate"));
    }

    #[test]
    fn first_run_creates_password_and_manages_todos() {
        let kv = MemoryKvStore::new();
        let output = run_script(
            &kv,
            true,
            "abc123\nadd Buy milk\nadd buy milk\nadd   \ntoggle 1\nrm 1\ny\nquit\n",
        );

        assert!(output.contains("Create Password"));
        assert!(output.contains("Password set."));
        assert!(output.contains("This todo already exists!"));
        assert!(output.contains("Todo text cannot be empty!"));
        assert!(output.contains("1. [x] Buy milk"));
        assert!(output.contains("Todo deleted successfully"));
        assert_eq!(kv.get(PASSWORD_KEY).unwrap().as_deref(), Some("abc123"));
        assert_eq!(kv.get(TODOS_KEY).unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn wrong_password_shows_inline_error_and_keeps_list_locked() {
        let kv = MemoryKvStore::with_entries([
            (PASSWORD_KEY, "pw"),
            (TODOS_KEY, r#"[{"id":1,"text":"secret","completed":false}]"#),
        ]);
        let output = run_script(&kv, true, "nope\n");

        assert!(output.contains("Enter Password"));
        assert!(output.contains("Incorrect password"));
        assert!(!output.contains("secret"));
    }

    #[test]
    fn edit_prompt_can_be_cancelled_and_password_changed() {
        let kv = MemoryKvStore::with_entries([
            (PASSWORD_KEY, "pw"),
            (TODOS_KEY, r#"[{"id":1,"text":"Read","completed":false}]"#),
        ]);
        let output = run_script(
            &kv,
            true,
            "pw\nedit 1\n\nedit 1 Read book\npasswd\nwrong\nnext\npasswd\npw\nnext\nlogout\nnext\nquit\n",
        );

        assert!(output.contains("Edit cancelled."));
        assert!(output.contains("1. [ ] Read book"));
        assert!(output.contains("Incorrect current password"));
        assert!(output.contains("Password changed successfully"));
        assert_eq!(kv.get(PASSWORD_KEY).unwrap().as_deref(), Some("next"));
    }

    #[test]
    fn offline_banner_follows_connectivity() {
        let kv = MemoryKvStore::new();
        let output = run_script(&kv, false, "pw\nonline\nls\nquit\n");
        assert_eq!(output.matches("You are currently offline").count(), 2);
    }
}
