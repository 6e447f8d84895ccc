// SPDX-License-Identifier: GPL-3.0-only

use anyhow::Context;
use calloop::{
    channel::{self, Event},
    timer::{TimeoutAction, Timer},
    EventLoop, InsertError, LoopSignal,
};
use clap_lex::RawArgs;
use futures_executor::ThreadPool;
use parking_lot::Mutex;
use std::{
    error::Error,
    io::{self, BufRead},
    path::PathBuf,
    process,
    sync::Arc,
    thread,
    time::Duration,
};
use tracing::{debug, error, info, warn};

use kbdd::{
    config::Config,
    dbus::DbusState,
    feed::{FeedError, FeedEvent},
    input::{xkb, xkb::XkbKeyboard, Keyboard},
    logger,
    panel::{CommandPanel, PanelNotifier},
    Classifier, Kbdd, LayoutTable, RemoteSwitch, Session,
};
use kbdd_config::KbddConfig;

type Panels = Vec<Box<dyn PanelNotifier + Send>>;
type Daemon = Session<XkbKeyboard, Panels>;

struct LoopData {
    session: Arc<Mutex<Daemon>>,
    config: Config,
    signal: LoopSignal,
}

fn main() {
    if let Err(err) = main_inner() {
        error!("Error occured in main(): {}", err);
        process::exit(1);
    }
}

fn main_inner() -> Result<(), Box<dyn Error>> {
    let raw_args = RawArgs::from_args();
    let mut cursor = raw_args.cursor();
    let git_hash = option_env!("GIT_HASH").unwrap_or("unknown");
    let mut config_path = None;

    // Parse the arguments
    while let Some(arg) = raw_args.next_os(&mut cursor) {
        match arg.to_str() {
            Some("--help") | Some("-h") => {
                print_help(env!("CARGO_PKG_VERSION"), git_hash);
                return Ok(());
            }
            Some("--version") | Some("-V") => {
                println!("kbdd {} (git commit {})", env!("CARGO_PKG_VERSION"), git_hash);
                return Ok(());
            }
            Some("--config") | Some("-c") => {
                let Some(path) = raw_args.next_os(&mut cursor) else {
                    return Err("--config expects a path".into());
                };
                config_path = Some(PathBuf::from(path));
            }
            _ => {
                eprintln!("Ignoring unknown argument {:?}", arg);
            }
        }
    }

    // setup logger
    logger::init_logger()?;
    info!("kbdd starting up!");

    let config = Config::load(config_path.as_deref());
    let executor = ThreadPool::new().context("Failed to start executor")?;
    let dbus = config.kbdd.dbus.then(|| DbusState::new(&executor));

    let mut panels: Panels = vec![Box::new(CommandPanel::new(
        config.kbdd.notify_command.clone(),
    ))];
    if let Some(dbus) = dbus.as_ref() {
        panels.push(Box::new(dbus.signal_panel()));
    }

    let kbdd = Kbdd::new(
        LayoutTable::default(),
        Classifier::new(config.kbdd.naming.clone()),
        panels,
    );
    let session: Arc<Mutex<Daemon>> = Arc::new(Mutex::new(Session::new(kbdd, None)));
    load_keymap(&mut session.lock(), &config.kbdd);

    if let Some(dbus) = dbus.as_ref() {
        let target: Arc<Mutex<dyn RemoteSwitch>> = session.clone();
        dbus.serve(target);
    }

    // init event loop
    let mut event_loop: EventLoop<LoopData> =
        EventLoop::try_new().with_context(|| "Failed to initialize event loop")?;

    let (feed_tx, feed_rx) = channel::channel::<String>();
    event_loop
        .handle()
        .insert_source(feed_rx, |event, _, data| match event {
            Event::Msg(line) => handle_line(data, &line),
            Event::Closed => {
                info!("Event feed closed");
                data.signal.stop();
            }
        })
        .map_err(|InsertError { error, .. }| error)
        .with_context(|| "Failed to add event feed to event loop")?;

    thread::Builder::new()
        .name("kbdd-feed".into())
        .spawn(move || {
            for line in io::stdin().lock().lines() {
                match line {
                    Ok(line) => {
                        if feed_tx.send(line).is_err() {
                            break;
                        }
                    }
                    Err(err) => {
                        warn!(?err, "Failed to read event feed");
                        break;
                    }
                }
            }
        })
        .with_context(|| "Failed to spawn event feed reader")?;

    if config.kbdd.announce_interval_ms > 0 {
        let interval = Duration::from_millis(config.kbdd.announce_interval_ms);
        event_loop
            .handle()
            .insert_source(Timer::from_duration(interval), move |_, _, data| {
                data.session.lock().announce();
                TimeoutAction::ToDuration(interval)
            })
            .map_err(|InsertError { error, .. }| error)
            .with_context(|| "Failed to add announce timer to event loop")?;
    }

    let mut data = LoopData {
        session,
        config,
        signal: event_loop.get_signal(),
    };
    event_loop.run(None, &mut data, |_| {})?;

    data.session.lock().shutdown();
    info!("Shutting down");
    Ok(())
}

fn handle_line(data: &mut LoopData, line: &str) {
    let event = match line.parse::<FeedEvent>() {
        Ok(event) => event,
        Err(FeedError::Empty) => return,
        Err(err) => {
            warn!(?err, line, "Ignoring malformed event");
            return;
        }
    };
    debug!(?event, "Feed event");

    match event {
        FeedEvent::Focus(view) => data.session.lock().focus_changed(Some(&view)),
        FeedEvent::Unfocus => data.session.lock().focus_changed(None),
        FeedEvent::Key => data.session.lock().key_pressed(),
        FeedEvent::Lock(layout) => {
            if let Some(keyboard) = data.session.lock().keyboard_mut() {
                keyboard.sync_locked_layout(layout);
            }
        }
        FeedEvent::Reload => match data.config.reload() {
            Ok(config) => load_keymap(&mut data.session.lock(), config),
            Err(err) => warn!(?err, "Failed to reload config, keeping the current one"),
        },
        FeedEvent::Enable(enabled) => data.session.lock().enable(enabled),
        FeedEvent::Switch(layout) => {
            let accepted = data.session.lock().switch(&layout);
            info!(layout, accepted, "Layout switch requested");
        }
    }
}

/// Compile the configured keymap and swap in its keyboard and layout table.
///
/// Keeps the current ones if the keymap does not compile.
fn load_keymap(session: &mut Daemon, config: &KbddConfig) {
    let keymap = match xkb::compile_keymap(&config.xkb) {
        Ok(keymap) => keymap,
        Err(err) => {
            warn!(?err, "Keeping the current keyboard");
            return;
        }
    };
    let table = xkb::table_for_keymap(&config.xkb, &keymap);
    let mut keyboard =
        XkbKeyboard::from_keymap(keymap).with_apply_command(config.apply_command.clone());

    if let Some(previous) = session.keyboard() {
        let layout = previous.locked_layout();
        if layout < keyboard.num_layouts() {
            keyboard.sync_locked_layout(layout);
        }
    }

    info!(layouts = %table, "Keymap loaded");
    session.set_keyboard(Some(keyboard));
    session.set_layouts(table);
}

fn print_help(version: &str, git_rev: &str) {
    println!(
        r#"kbdd {version} (git commit {git_rev})
Tracks the keyboard layout of every focused view.

Reads events from stdin, one per line:
    focus <id> <app-id>, unfocus, key, lock <layout>,
    reload, enable <0|1>, switch <LAYOUT>

Options:
  -c, --config <PATH>  Read the configuration from PATH
  -h, --help           Show this message
  -V, --version        Show the version of kbdd"#
    );
}
