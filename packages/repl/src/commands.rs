//! Shell command parsing and execution.
//!
//! Commands:
//! - `ls [path]` - List the keys and buckets in a bucket
//! - `get <path> [--json <pointer>]` - Print a value, or a member of a JSON value
//! - `put <path> <value>` - Store a value verbatim
//! - `put <path> --json-patch <patch>` - Apply a JSON Patch to a stored JSON value
//! - `put <path> --json <pointer> <value>` - Set one member of a stored JSON value
//! - `cd [path]` - Change the working bucket (root if no path)
//! - `mkdir <path>` - Create a bucket
//! - `rm <path>` - Delete a key, or a bucket with everything in it
//! - `mode <batch|interactive>` - Switch the display mode
//! - `pwd` - Print the working bucket
//! - `help [command]` - Show help
//! - `exit` - Leave the shell, saving changes
//!
//! Paths are resolved against the working bucket. The last segment names the
//! key; the segments before it must be existing buckets.

use thunder_store::{parse_key_path, printable_list, travel, Bucket, Stranded};

use crate::io::CompletionKind;
use crate::mode::Mode;
use crate::session::Session;

/// What a command's first argument completes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgCompletion {
    Path(CompletionKind),
    Mode,
    Command,
    Nothing,
}

/// Static description of one shell command.
#[derive(Debug)]
pub struct CommandSpec {
    pub name: &'static str,
    pub usage: &'static str,
    pub help: &'static str,
    pub long_help: &'static str,
    pub completion: ArgCompletion,
}

/// Every command the shell understands, in help order.
pub const COMMANDS: &[CommandSpec] = &[
    CommandSpec {
        name: "cd",
        usage: "[path]",
        help: "jump to a bucket",
        long_help: "jumps to a bucket (empty to jump back to the root bucket)",
        completion: ArgCompletion::Path(CompletionKind::Buckets),
    },
    CommandSpec {
        name: "exit",
        usage: "",
        help: "exit the program",
        long_help: "saves all changes and exits the program",
        completion: ArgCompletion::Nothing,
    },
    CommandSpec {
        name: "get",
        usage: "<key> [--json <pointer>]",
        help: "show value",
        long_help: "shows the value of a key; with --json, only the member at the JSON pointer",
        completion: ArgCompletion::Path(CompletionKind::Keys),
    },
    CommandSpec {
        name: "help",
        usage: "[command]",
        help: "display help",
        long_help: "lists all commands, or shows help for one command",
        completion: ArgCompletion::Command,
    },
    CommandSpec {
        name: "ls",
        usage: "[path]",
        help: "list keys",
        long_help: "lists keys in a bucket",
        completion: ArgCompletion::Path(CompletionKind::Buckets),
    },
    CommandSpec {
        name: "mkdir",
        usage: "<bucket>",
        help: "create a bucket",
        long_help: "creates a bucket",
        completion: ArgCompletion::Path(CompletionKind::Keys),
    },
    CommandSpec {
        name: "mode",
        usage: "<batch|interactive>",
        help: "sets the shell mode",
        long_help: "sets the shell mode (interactive or batch)",
        completion: ArgCompletion::Mode,
    },
    CommandSpec {
        name: "put",
        usage: "<key> <value> | <key> --json-patch <patch> | <key> --json <pointer> <value>",
        help: "put value",
        long_help: "sets the value of a key; --json-patch applies a JSON Patch to the stored \
                    JSON, --json sets the member at the JSON pointer (the value must be JSON)",
        completion: ArgCompletion::Path(CompletionKind::Keys),
    },
    CommandSpec {
        name: "pwd",
        usage: "",
        help: "print the working bucket",
        long_help: "prints the path of the working bucket",
        completion: ArgCompletion::Nothing,
    },
    CommandSpec {
        name: "quit",
        usage: "",
        help: "exit the program",
        long_help: "saves all changes and exits the program",
        completion: ArgCompletion::Nothing,
    },
    CommandSpec {
        name: "rm",
        usage: "<key>",
        help: "delete a key",
        long_help: "deletes a key, or a bucket and everything in it",
        completion: ArgCompletion::Path(CompletionKind::Keys),
    },
];

pub fn find_command(name: &str) -> Option<&'static CommandSpec> {
    COMMANDS.iter().find(|spec| spec.name == name)
}

/// Why a command failed. The session always carries on.
#[derive(thiserror::Error, Debug)]
pub enum CommandError {
    /// Wrong number or shape of arguments; nothing was resolved.
    #[error("{0}")]
    Usage(String),

    #[error("unknown command: {0}")]
    UnknownCommand(String),

    #[error(transparent)]
    Store(#[from] thunder_store::Error),

    #[error(transparent)]
    Json(#[from] thunder_json_patch::Error),
}

impl<B: Bucket> From<Stranded<B>> for CommandError {
    fn from(stranded: Stranded<B>) -> Self {
        CommandError::Store(stranded.into_error())
    }
}

fn usage<T>(message: &str) -> Result<T, CommandError> {
    Err(CommandError::Usage(message.to_string()))
}

/// Result of executing a command
#[derive(Debug)]
pub enum CommandResult {
    /// Command succeeded, optionally with output to display
    Ok { display: Option<Vec<u8>> },
    /// Command failed
    Error(CommandError),
    /// User requested to exit
    Exit,
}

impl CommandResult {
    fn ok_none() -> Self {
        CommandResult::Ok { display: None }
    }
}

impl From<Result<Option<Vec<u8>>, CommandError>> for CommandResult {
    fn from(result: Result<Option<Vec<u8>>, CommandError>) -> Self {
        match result {
            Ok(display) => CommandResult::Ok { display },
            Err(e) => CommandResult::Error(e),
        }
    }
}

/// Tokenize and execute one input line.
///
/// Blank lines and lines starting with `#` do nothing. Arguments follow
/// POSIX shell quoting.
pub fn execute<B: Bucket>(line: &str, session: &mut Session<B>) -> CommandResult {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return CommandResult::ok_none();
    }
    let Some(args) = shlex::split(line) else {
        return CommandResult::Error(CommandError::Usage("invalid quoting".to_string()));
    };
    if args.is_empty() {
        return CommandResult::ok_none();
    }
    execute_args(&args, session)
}

/// Execute an already tokenized command: name first, then its arguments.
pub fn execute_args<B: Bucket>(args: &[String], session: &mut Session<B>) -> CommandResult {
    let Some((command, args)) = args.split_first() else {
        return CommandResult::ok_none();
    };
    log::debug!("Executing '{}' in {}", command, session.cwd());

    let result = match command.as_str() {
        "ls" => cmd_ls(args, session),
        "get" => cmd_get(args, session),
        "put" => cmd_put(args, session),
        "cd" => cmd_cd(args, session),
        "mkdir" => cmd_mkdir(args, session),
        "rm" => cmd_rm(args, session),
        "mode" => cmd_mode(args, session),
        "pwd" => Ok(Some(session.cwd().to_string().into_bytes())),
        "help" => cmd_help(args),
        "exit" | "quit" => return CommandResult::Exit,
        other => Err(CommandError::UnknownCommand(other.to_string())),
    };
    result.into()
}

fn display_lines(lines: Vec<String>) -> Option<Vec<u8>> {
    if lines.is_empty() {
        None
    } else {
        Some(lines.join("\n").into_bytes())
    }
}

fn cmd_ls<B: Bucket>(args: &[String], session: &Session<B>) -> Result<Option<Vec<u8>>, CommandError> {
    let target = match args.first() {
        Some(path) => travel(session.cwd(), path)?,
        None => session.cwd().clone(),
    };

    let contents = target.list()?;
    let mut lines = printable_list(&contents);

    if session.mode() == Mode::Interactive {
        let omitted = contents.len() - lines.len();
        let footnote = if omitted > 0 {
            format!(" ({} omitted in this list)", omitted)
        } else {
            String::new()
        };
        lines.push(format!("{} keys in bucket{}", contents.len(), footnote));
    }

    Ok(display_lines(lines))
}

fn cmd_get<B: Bucket>(args: &[String], session: &Session<B>) -> Result<Option<Vec<u8>>, CommandError> {
    let pointer = match args {
        [] => return usage("get: missing key name"),
        [_] => None,
        [_, flag, pointer] if flag.as_str() == "--json" => Some(pointer.as_str()),
        _ => return usage("get: too many arguments"),
    };

    let (bucket, key) = parse_key_path(session.cwd(), &args[0])?;
    let mut data = bucket.get(key.as_bytes())?;
    if let Some(pointer) = pointer {
        data = thunder_json_patch::find(&data, pointer)?;
    }

    Ok(Some(data))
}

/// The three ways `put` can write.
enum PutMode<'a> {
    Raw(&'a str),
    Patch(&'a str),
    AddAt { pointer: &'a str, value: &'a str },
}

fn cmd_put<B: Bucket>(args: &[String], session: &Session<B>) -> Result<Option<Vec<u8>>, CommandError> {
    let mode = match args {
        [] => return usage("put: missing key name and value"),
        [_] => return usage("put: missing value"),
        [_, value] => PutMode::Raw(value),
        [_, flag, patch] => {
            if flag.as_str() != "--json-patch" {
                return usage("put: expected: <key> --json-patch <patch>");
            }
            PutMode::Patch(patch)
        }
        [_, flag, pointer, value] => {
            if flag.as_str() != "--json" {
                return usage("put: expected: <key> --json <pointer> <value>");
            }
            PutMode::AddAt { pointer, value }
        }
        _ => return usage("put: too many arguments"),
    };

    let (bucket, key) = parse_key_path(session.cwd(), &args[0])?;
    let key = key.as_bytes();
    match mode {
        PutMode::Raw(value) => bucket.put(key, value.as_bytes())?,
        PutMode::Patch(patch) => thunder_json_patch::patch_value(&bucket, key, patch.as_bytes())?,
        PutMode::AddAt { pointer, value } => {
            thunder_json_patch::add_at_pointer(&bucket, key, pointer, value)?
        }
    }
    Ok(None)
}

fn cmd_cd<B: Bucket>(args: &[String], session: &mut Session<B>) -> Result<Option<Vec<u8>>, CommandError> {
    let target = match args.first() {
        Some(path) => travel(session.cwd(), path)?,
        None => session.cwd().root(),
    };
    session.set_cwd(target);
    Ok(None)
}

fn cmd_mkdir<B: Bucket>(args: &[String], session: &Session<B>) -> Result<Option<Vec<u8>>, CommandError> {
    let Some(path) = args.first() else {
        return usage("mkdir: missing bucket name");
    };
    let (bucket, name) = parse_key_path(session.cwd(), path)?;
    bucket.mkdir(name.as_bytes())?;
    Ok(None)
}

fn cmd_rm<B: Bucket>(args: &[String], session: &Session<B>) -> Result<Option<Vec<u8>>, CommandError> {
    let Some(path) = args.first() else {
        return usage("rm: missing bucket or key name");
    };
    let (bucket, name) = parse_key_path(session.cwd(), path)?;
    bucket.rm(name.as_bytes())?;
    Ok(None)
}

fn cmd_mode<B: Bucket>(args: &[String], session: &mut Session<B>) -> Result<Option<Vec<u8>>, CommandError> {
    match args {
        [name] => match Mode::parse(name) {
            Some(mode) => {
                session.set_mode(mode);
                Ok(None)
            }
            None => usage(&format!("mode: single argument needed: {}", Mode::list())),
        },
        _ => usage(&format!("mode: single argument needed: {}", Mode::list())),
    }
}

fn cmd_help(args: &[String]) -> Result<Option<Vec<u8>>, CommandError> {
    match args.first() {
        Some(name) => {
            let spec = find_command(name).ok_or_else(|| CommandError::UnknownCommand(name.clone()))?;
            Ok(Some(format!(
                "{}\n\nUsage: {} {}",
                spec.long_help, spec.name, spec.usage
            )
            .into_bytes()))
        }
        None => Ok(Some(format_help().into_bytes())),
    }
}

/// The command overview printed by `help`.
pub fn format_help() -> String {
    let mut help = String::from("Commands:\n");
    for spec in COMMANDS {
        help.push_str(&format!("  {:<8} {}\n", spec.name, spec.help));
    }
    help.push_str("\nType \"help <command>\" for details.");
    help
}

#[cfg(test)]
mod tests {
    use super::*;
    use thunder_store::{MemoryBucket, MemoryStore, Transaction};

    fn run<B: Bucket>(session: &mut Session<B>, line: &str) -> Result<Option<String>, CommandError> {
        match execute(line, session) {
            CommandResult::Ok { display } => Ok(display.map(|d| String::from_utf8(d).unwrap())),
            CommandResult::Error(e) => Err(e),
            CommandResult::Exit => panic!("unexpected exit from '{line}'"),
        }
    }

    fn ok<B: Bucket>(session: &mut Session<B>, line: &str) -> Option<String> {
        run(session, line).unwrap_or_else(|e| panic!("'{line}' failed: {e}"))
    }

    fn usage_of<B: Bucket>(session: &mut Session<B>, line: &str) -> String {
        match run(session, line) {
            Err(CommandError::Usage(message)) => message,
            other => panic!("expected a usage error from '{line}', got {other:?}"),
        }
    }

    fn not_found<B: Bucket>(session: &mut Session<B>, line: &str) {
        match run(session, line) {
            Err(CommandError::Store(e)) if e.is_not_found() => {}
            Err(CommandError::Json(thunder_json_patch::Error::Store(e))) if e.is_not_found() => {}
            other => panic!("expected not found from '{line}', got {other:?}"),
        }
    }

    fn batch(root: MemoryBucket<'_>) -> Session<MemoryBucket<'_>> {
        Session::new(root, "test.db", Mode::Batch)
    }

    #[test]
    fn get_returns_binary_values_unchanged() {
        let store = MemoryStore::new();
        let tx = store.begin();
        tx.root().put(b"bin", &[0x66, 0xff, 0x00, 0x80]).unwrap();
        let mut session = batch(tx.root());

        match execute("get bin", &mut session) {
            CommandResult::Ok { display } => assert_eq!(display, Some(vec![0x66, 0xff, 0x00, 0x80])),
            other => panic!("get failed: {other:?}"),
        }
    }

    #[test]
    fn put_then_get_round_trips() {
        let store = MemoryStore::new();
        let tx = store.begin();
        let mut session = batch(tx.root());

        assert_eq!(ok(&mut session, "put foo bar"), None);
        assert_eq!(ok(&mut session, "get foo"), Some("bar".to_string()));

        ok(&mut session, "put spaced 'a value with  spaces'");
        assert_eq!(
            ok(&mut session, "get spaced"),
            Some("a value with  spaces".to_string())
        );
        assert_eq!(tx.root().get(b"spaced").unwrap(), b"a value with  spaces");
    }

    #[test]
    fn mkdir_cd_ls_and_back() {
        let store = MemoryStore::new();
        let tx = store.begin();
        let mut session = batch(tx.root());

        ok(&mut session, "mkdir sub");
        ok(&mut session, "cd sub");
        assert_eq!(session.cwd().to_string(), "/sub");
        assert_eq!(ok(&mut session, "ls"), None);
        ok(&mut session, "cd ..");
        assert_eq!(session.cwd().to_string(), "/");
        assert_eq!(ok(&mut session, "pwd"), Some("/".to_string()));
    }

    #[test]
    fn json_patch_then_pointer_get() {
        let store = MemoryStore::new();
        let tx = store.begin();
        let mut session = batch(tx.root());

        ok(&mut session, r#"put x '{"a":0}'"#);
        ok(
            &mut session,
            r#"put x --json-patch '[{"op":"replace","path":"/a","value":1}]'"#,
        );
        assert_eq!(ok(&mut session, "get x"), Some(r#"{"a":1}"#.to_string()));
        assert_eq!(ok(&mut session, "get x --json /a"), Some("1".to_string()));
    }

    #[test]
    fn put_json_sets_member() {
        let store = MemoryStore::new();
        let tx = store.begin();
        let mut session = batch(tx.root());

        ok(&mut session, r#"put cfg '{"name":"a"}'"#);
        ok(&mut session, r#"put cfg --json /name '"b"'"#);
        ok(&mut session, "put cfg --json /port 8080");
        assert_eq!(
            ok(&mut session, "get cfg"),
            Some(r#"{"name":"b","port":8080}"#.to_string())
        );

        let err = run(&mut session, "put cfg --json /name bare").unwrap_err();
        assert!(matches!(
            err,
            CommandError::Json(thunder_json_patch::Error::InvalidSplice { .. })
        ));
    }

    #[test]
    fn put_into_missing_bucket_writes_nothing() {
        let store = MemoryStore::new();
        let tx = store.begin();
        let mut session = batch(tx.root());

        not_found(&mut session, "put a/b/c val");
        not_found(&mut session, "get a/b/c");
        not_found(&mut session, r#"put a/b/c --json-patch '[]'"#);
        not_found(&mut session, "put a/b/c --json /x 1");
        assert!(tx.root().list().unwrap().is_empty());
    }

    #[test]
    fn rm_removes_subtree() {
        let store = MemoryStore::new();
        let tx = store.begin();
        let mut session = batch(tx.root());

        ok(&mut session, "mkdir sub");
        ok(&mut session, "mkdir sub/inner");
        ok(&mut session, "put sub/inner/k v");
        ok(&mut session, "put keep v");
        ok(&mut session, "rm sub");
        assert_eq!(ok(&mut session, "ls"), Some("keep".to_string()));
        not_found(&mut session, "get sub/inner/k");
    }

    #[test]
    fn failed_cd_keeps_working_bucket() {
        let store = MemoryStore::new();
        let tx = store.begin();
        let mut session = batch(tx.root());

        ok(&mut session, "mkdir a");
        ok(&mut session, "cd a");
        not_found(&mut session, "cd missing");
        not_found(&mut session, "cd ../nope/..");
        assert_eq!(session.cwd().to_string(), "/a");
    }

    #[test]
    fn cd_without_argument_returns_to_root() {
        let store = MemoryStore::new();
        let tx = store.begin();
        let mut session = batch(tx.root());

        ok(&mut session, "mkdir a");
        ok(&mut session, "mkdir a/b");
        ok(&mut session, "cd a/b");
        assert_eq!(session.cwd().to_string(), "/a/b");
        ok(&mut session, "cd");
        assert_eq!(session.cwd().to_string(), "/");
        ok(&mut session, "cd ../../..");
        assert_eq!(session.cwd().to_string(), "/");
    }

    #[test]
    fn leading_slash_is_relative_to_cwd() {
        let store = MemoryStore::new();
        let tx = store.begin();
        let mut session = batch(tx.root());

        ok(&mut session, "mkdir a");
        ok(&mut session, "cd a");
        ok(&mut session, "put /k v");
        assert_eq!(tx.root().cd(b"a").unwrap().get(b"k").unwrap(), b"v");
    }

    #[test]
    fn ls_footer_in_interactive_mode() {
        let store = MemoryStore::new();
        let tx = store.begin();
        let root = tx.root();
        root.put(b"visible", b"").unwrap();
        root.put(b"bell\x07", b"").unwrap();
        root.put(b"\xff\xfe", b"").unwrap();
        let mut session = Session::new(root, "test.db", Mode::Interactive);

        assert_eq!(
            ok(&mut session, "ls"),
            Some("visible\n3 keys in bucket (2 omitted in this list)".to_string())
        );

        ok(&mut session, "mode batch");
        assert_eq!(ok(&mut session, "ls"), Some("visible".to_string()));
    }

    #[test]
    fn ls_footer_without_omissions() {
        let store = MemoryStore::new();
        let tx = store.begin();
        let mut session = Session::new(tx.root(), "test.db", Mode::Interactive);
        assert_eq!(ok(&mut session, "ls"), Some("0 keys in bucket".to_string()));
    }

    #[test]
    fn ls_with_path() {
        let store = MemoryStore::new();
        let tx = store.begin();
        let mut session = batch(tx.root());

        ok(&mut session, "mkdir a");
        ok(&mut session, "put a/one 1");
        ok(&mut session, "put a/two 2");
        assert_eq!(ok(&mut session, "ls a"), Some("one\ntwo".to_string()));
        not_found(&mut session, "ls nope");
    }

    #[test]
    fn empty_patch_keeps_bytes() {
        let store = MemoryStore::new();
        let tx = store.begin();
        let mut session = batch(tx.root());

        ok(&mut session, r#"put x '{ "a" : 0 }'"#);
        ok(&mut session, "put x --json-patch '[]'");
        assert_eq!(ok(&mut session, "get x"), Some(r#"{ "a" : 0 }"#.to_string()));
    }

    #[test]
    fn failing_patch_keeps_value() {
        let store = MemoryStore::new();
        let tx = store.begin();
        let mut session = batch(tx.root());

        ok(&mut session, r#"put x '{"a":0}'"#);
        let err = run(
            &mut session,
            r#"put x --json-patch '[{"op":"replace","path":"/a","value":1},{"op":"test","path":"/a","value":0}]'"#,
        )
        .unwrap_err();
        assert!(matches!(err, CommandError::Json(_)));
        assert_eq!(ok(&mut session, "get x"), Some(r#"{"a":0}"#.to_string()));
    }

    #[test]
    fn get_pointer_errors() {
        let store = MemoryStore::new();
        let tx = store.begin();
        let mut session = batch(tx.root());

        ok(&mut session, "put raw text");
        ok(&mut session, r#"put doc '{"a":1}'"#);
        assert!(matches!(
            run(&mut session, "get doc --json /b"),
            Err(CommandError::Json(thunder_json_patch::Error::PointerNotFound(_)))
        ));
        assert!(matches!(
            run(&mut session, "get raw --json /a"),
            Err(CommandError::Json(thunder_json_patch::Error::NotJson(_)))
        ));
    }

    #[test]
    fn key_bucket_collisions() {
        let store = MemoryStore::new();
        let tx = store.begin();
        let mut session = batch(tx.root());

        ok(&mut session, "mkdir sub");
        ok(&mut session, "put key v");
        assert!(matches!(
            run(&mut session, "mkdir key"),
            Err(CommandError::Store(thunder_store::Error::AlreadyExists { .. }))
        ));
        assert!(matches!(
            run(&mut session, "put sub v"),
            Err(CommandError::Store(thunder_store::Error::IncompatibleValue { .. }))
        ));
        not_found(&mut session, "rm nothing");
    }

    #[test]
    fn usage_errors() {
        let store = MemoryStore::new();
        let tx = store.begin();
        let mut session = batch(tx.root());

        assert_eq!(usage_of(&mut session, "get"), "get: missing key name");
        assert_eq!(usage_of(&mut session, "get a b"), "get: too many arguments");
        assert_eq!(usage_of(&mut session, "get a --pointer /x"), "get: too many arguments");
        assert_eq!(usage_of(&mut session, "get a --json /x y"), "get: too many arguments");
        assert_eq!(usage_of(&mut session, "put"), "put: missing key name and value");
        assert_eq!(usage_of(&mut session, "put k"), "put: missing value");
        assert_eq!(
            usage_of(&mut session, "put k --patch []"),
            "put: expected: <key> --json-patch <patch>"
        );
        assert_eq!(
            usage_of(&mut session, "put k --set /a 1"),
            "put: expected: <key> --json <pointer> <value>"
        );
        assert_eq!(usage_of(&mut session, "put a b c d e"), "put: too many arguments");
        assert_eq!(usage_of(&mut session, "mkdir"), "mkdir: missing bucket name");
        assert_eq!(usage_of(&mut session, "rm"), "rm: missing bucket or key name");
        assert_eq!(
            usage_of(&mut session, "mode"),
            "mode: single argument needed: [batch interactive]"
        );
        assert_eq!(
            usage_of(&mut session, "mode fast"),
            "mode: single argument needed: [batch interactive]"
        );
        assert_eq!(usage_of(&mut session, "put k 'unterminated"), "invalid quoting");
    }

    #[test]
    fn usage_errors_touch_nothing() {
        let store = MemoryStore::new();
        let tx = store.begin();
        let mut session = batch(tx.root());

        usage_of(&mut session, "put missing/bucket --patch []");
        assert!(tx.root().list().unwrap().is_empty());
    }

    #[test]
    fn raw_put_of_flag_looking_value() {
        let store = MemoryStore::new();
        let tx = store.begin();
        let mut session = batch(tx.root());

        ok(&mut session, "put k --json");
        assert_eq!(ok(&mut session, "get k"), Some("--json".to_string()));
    }

    #[test]
    fn unknown_command_and_comments() {
        let store = MemoryStore::new();
        let tx = store.begin();
        let mut session = batch(tx.root());

        let err = run(&mut session, "frobnicate x").unwrap_err();
        assert_eq!(err.to_string(), "unknown command: frobnicate");
        assert_eq!(ok(&mut session, "   "), None);
        assert_eq!(ok(&mut session, "# put k v"), None);
        assert!(tx.root().list().unwrap().is_empty());
    }

    #[test]
    fn exit_and_quit() {
        let store = MemoryStore::new();
        let tx = store.begin();
        let mut session = batch(tx.root());

        assert!(matches!(execute("exit", &mut session), CommandResult::Exit));
        assert!(matches!(execute("quit", &mut session), CommandResult::Exit));
    }

    #[test]
    fn help_lists_and_describes() {
        let store = MemoryStore::new();
        let tx = store.begin();
        let mut session = batch(tx.root());

        let all = ok(&mut session, "help").unwrap();
        for spec in COMMANDS {
            assert!(all.contains(spec.name), "help is missing {}", spec.name);
        }
        let cd = ok(&mut session, "help cd").unwrap();
        assert!(cd.contains("jumps to a bucket (empty to jump back to the root bucket)"));
        assert!(matches!(
            run(&mut session, "help nope"),
            Err(CommandError::UnknownCommand(_))
        ));
    }

    #[test]
    fn execute_args_skips_tokenizing() {
        let store = MemoryStore::new();
        let tx = store.begin();
        let mut session = batch(tx.root());

        let args: Vec<String> = ["put", "k", "it's 'quoted'"].map(String::from).to_vec();
        assert!(matches!(
            execute_args(&args, &mut session),
            CommandResult::Ok { display: None }
        ));
        assert_eq!(tx.root().get(b"k").unwrap(), b"it's 'quoted'");
    }
}
