use netbuilder_prefix::build_space;
use netbuilder_prefix::config::Config;
use netbuilder_prefix::output::{print_tree, tree_print};
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    // Do as little as possible in main.rs as it can't contain any tests
    let config = Config::from_env();
    log4rs::init_file(&config.log_config, Default::default()).expect("Error initializing log4rs");
    log::info!("#Start main()");

    let args: Vec<String> = std::env::args().skip(1).collect();
    let outline = args.iter().any(|a| a == "--outline");
    let plan_file = args
        .iter()
        .find(|a| !a.starts_with("--"))
        .cloned()
        .unwrap_or(config.plan_file);

    let (space, _blocks) = build_space(&plan_file)?;
    if outline {
        print_tree(&space, space.root())?;
    } else {
        tree_print(&space, space.root())?;
    }

    Ok(())
}
