use argh::FromArgs;
use jobsh::Interpreter;

const DEFAULT_PROMPT: &str = "308sh> ";

fn default_prompt() -> String {
    DEFAULT_PROMPT.to_string()
}

#[derive(FromArgs)]
/// Interactive shell with background job control.
struct Args {
    #[argh(option, short = 'p', default = "default_prompt()")]
    /// prompt text shown before each line
    prompt: String,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args: Args = argh::from_env();

    let mut shell = Interpreter::default();
    if let Err(e) = shell.repl(&args.prompt) {
        eprintln!("jobsh: {:#}", e);
        std::process::exit(1);
    }
    // Background jobs still running are left to the OS.
    std::process::exit(0);
}
