use std::{env, io};

use structopt::{clap::Shell, StructOpt};
use supost::{run_post, run_scrap, Command, Opts};

fn init_logs(default_filter: &str) {
    if env::var_os("RUST_LOG").is_none() {
        env::set_var("RUST_LOG", default_filter);
    }
    env_logger::init();
}

fn main() -> anyhow::Result<()> {
    match Opts::from_args().command {
        Command::Scrap(opts) => {
            if !opts.quiet {
                init_logs("supost=info");
            }
            run_scrap(opts)
        }
        Command::Post(opts) => {
            init_logs("supost=info");
            run_post(opts)
        }
        Command::Completion => {
            Opts::clap().gen_completions_to("supost", Shell::Bash, &mut io::stdout());
            Ok(())
        }
    }
}
