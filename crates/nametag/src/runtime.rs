//! Builds a [`TagSystem`] from the config file and drives its menu through
//! the terminal picker.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::debug;

use nametag_config::{self as config, LanguageCatalog, YamlStore};
use nametag_core::{
    AdminOutcome, Backend, Click, ClickOutcome, CommandSender, ItemKind, MessageCatalog, Player,
    RouteOutcome, Settings, TagSystem,
};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::executor::{CommandAuthority, Launcher, ProcessSink, RosterDirectory};
use crate::output;
use crate::picker::{self, OpenGrid, PickerPresenter};
use crate::terminal::TerminalMessenger;

/// Label the administrative command answers to.
pub const ADMIN_LABEL: &str = "nametag";

/// Config file in force: `--config` / `NAMETAG_CONFIG`, else the platform
/// default.
pub fn config_file(global: &GlobalOpts) -> PathBuf {
    global.config.clone().unwrap_or_else(config::config_path)
}

/// Settings and catalog as currently on disk.
fn load_settings(config_file: &Path) -> Result<(Settings, Arc<dyn MessageCatalog>), CliError> {
    let cfg = config::load_config(config_file)?;
    let catalog: Arc<dyn MessageCatalog> = Arc::new(LanguageCatalog::load(
        &config::data_dir(&cfg, config_file),
        &cfg.language,
    )?);
    Ok((cfg.to_settings(), catalog))
}

pub struct Runtime {
    system: TagSystem,
    picker: Arc<PickerPresenter>,
    config_file: PathBuf,
    color: bool,
}

impl Runtime {
    pub fn build(global: &GlobalOpts) -> Result<Self, CliError> {
        let config_file = config_file(global);
        let cfg = config::load_config(&config_file)?;
        let data_dir = config::data_dir(&cfg, &config_file);
        debug!(config = %config_file.display(), data_dir = %data_dir.display(), "building runtime");

        let store = YamlStore::open(config::tags_path(&cfg, &config_file))?;
        let catalog = LanguageCatalog::load(&data_dir, &cfg.language)?;
        let color = output::should_color(&global.color);
        let launcher = Launcher::from_config(&cfg.executor);
        let picker = Arc::new(PickerPresenter::new());

        let backend = Backend {
            store: Box::new(store),
            sink: Arc::new(ProcessSink::new(launcher.clone(), global.dry_run)),
            authority: Arc::new(CommandAuthority::new(
                launcher.clone(),
                cfg.executor.permission_check.clone(),
            )),
            players: Arc::new(RosterDirectory::new(
                launcher,
                cfg.players.roster_command.clone(),
            )),
            catalog: Arc::new(catalog),
            messenger: Arc::new(TerminalMessenger::new(color, global.quiet)),
            presenter: picker.clone(),
        };

        Ok(Self {
            system: TagSystem::new(cfg.to_settings(), backend),
            picker,
            config_file,
            color,
        })
    }

    pub fn system(&self) -> &TagSystem {
        &self.system
    }

    pub fn color(&self) -> bool {
        self.color
    }

    /// Route one `/tag` invocation. A menu it opens is handed back
    /// through [`Runtime::take_grid`].
    pub fn execute(&mut self, sender: &CommandSender, args: &[String]) -> RouteOutcome {
        self.system.execute(sender, args)
    }

    /// The grid opened by the last invocation, if any.
    pub fn take_grid(&self) -> Option<OpenGrid> {
        self.picker.take_open()
    }

    /// Offer `grid` through the picker and feed the answer back as a click
    /// or a close.
    pub fn prompt(&mut self, grid: OpenGrid) -> Result<Option<ClickOutcome>, CliError> {
        match picker::choose(&grid.view, self.color) {
            Ok(Some((slot, kind))) => Ok(Some(self.click(&grid, slot, Some(kind)))),
            Ok(None) => {
                self.system.handle_close(&grid.player, grid.handle);
                Ok(None)
            }
            Err(e) => {
                self.system.handle_close(&grid.player, grid.handle);
                Err(e)
            }
        }
    }

    pub fn click(&mut self, grid: &OpenGrid, slot: usize, item: Option<ItemKind>) -> ClickOutcome {
        self.system.handle_click(&Click {
            player: grid.player.clone(),
            handle: grid.handle,
            slot: Some(slot),
            item,
        })
    }

    pub fn close(&mut self, grid: &OpenGrid) {
        self.system.handle_close(&grid.player, grid.handle);
    }

    pub fn disconnect(&mut self, player: &Player) {
        self.system.handle_disconnect(player);
    }

    /// The `nametag <args>` administrative command, reloading from the
    /// config file this runtime was built from.
    pub fn admin(&mut self, sender: &CommandSender, args: &[String]) -> AdminOutcome {
        let config_file = self.config_file.clone();
        self.system
            .execute_admin(sender, ADMIN_LABEL, args, || load_settings(&config_file))
    }
}

/// Sender for an optional `--as <player>`.
pub fn sender(player: Option<&str>) -> CommandSender {
    player.map_or(CommandSender::Console, |name| Player::new(name).into())
}
