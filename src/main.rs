//! tabhost - demo session driver
//!
//! `tabhost --cli` walks a short two-window session and prints the tab
//! snapshots along the way. Set `RUST_LOG=debug` to follow the lifecycle.

use std::env;

use tabhost::{CloseOutcome, NAME, Result, SurfaceId, SurfaceParams, TabHost, VERSION};

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();

    if args.len() > 1 && args[1] == "--cli" {
        if let Err(e) = run_cli_mode() {
            eprintln!("session failed: {}", e);
            std::process::exit(1);
        }
    } else {
        println!("{} v{}", NAME, VERSION);
        println!("usage: {} --cli", NAME);
    }
}

fn run_cli_mode() -> Result<()> {
    println!("{} v{} - demo session", NAME, VERSION);

    let mut host = TabHost::new();
    let main_window = host.open_window();
    let news = host.create_tab(
        SurfaceParams::in_window(main_window)
            .with_url("https://news.example/")
            .active(),
    )?;
    let mail = host.create_tab(
        SurfaceParams::in_window(main_window)
            .with_url("https://mail.example/")
            .pinned(),
    )?;
    host.run_until_idle();
    print_tabs(&host, &[news, mail])?;

    let side_window = host.open_window();
    println!("\nmoving {} to {}", news, side_window);
    if let Some(placeholder) = host.detach_guest(news)? {
        host.run_until_idle();
        println!("placeholder {} held the slot", placeholder);
    }
    host.move_to_window(news, Some(side_window));
    host.run_until_idle();
    print_tabs(&host, &[news, mail])?;

    println!("\nclosing {}", main_window);
    match host.request_window_close(main_window) {
        CloseOutcome::Hidden => println!("kept alive by a pinned tab, hidden instead"),
        CloseOutcome::Closed { orphaned } => println!("closed, {} tab(s) orphaned", orphaned.len()),
        CloseOutcome::NotFound => println!("no such window"),
    }

    host.begin_shutdown();
    for window in [main_window, side_window] {
        host.request_window_close(window);
    }
    host.run_until_idle();
    println!("\n{} window(s) left, {} surface(s) alive", host.window_count(), host.surface_count());
    Ok(())
}

fn print_tabs(host: &TabHost, tabs: &[SurfaceId]) -> Result<()> {
    for &id in tabs {
        if let Some(value) = host.tab_value(id) {
            println!("{}", value.to_json()?);
        }
    }
    Ok(())
}
