use crate::error::{Error, Result};
use crate::manager::ModManager;
use serde::{Deserialize, Serialize};
use std::sync::{
    mpsc::{self, Receiver, Sender},
    Arc, Mutex,
};
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModRef {
    pub name: String,
    pub version: String,
}

// Wire commands from the remote controller. Field names are fixed by the
// protocol, including the capitalized "Mod".
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "msg", rename_all = "lowercase")]
pub enum Command {
    InstallMod {
        url: String,
        #[serde(rename = "Mod")]
        mod_ref: ModRef,
    },
    SetMod {
        #[serde(rename = "Mod")]
        mod_ref: ModRef,
    },
    DeleteMod {
        #[serde(rename = "Mod")]
        mod_ref: ModRef,
    },
    DeleteMods,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "msg", rename_all = "lowercase")]
pub enum Reply {
    Ready,
}

#[derive(Debug, Clone)]
pub struct InstallDone {
    pub name: String,
}

// External collaborator that fetches and unpacks a bundle into the cache.
// Implementations signal completion through the channel handed to them;
// the dispatcher is the channel's only consumer.
pub trait Installer: Send {
    fn install_mod(
        &mut self,
        name: &str,
        version: &str,
        url: &str,
        done: Sender<InstallDone>,
    ) -> Result<()>;
}

pub struct Dispatcher {
    manager: Arc<Mutex<ModManager>>,
    installer: Box<dyn Installer>,
    reply_tx: Sender<Reply>,
    done_tx: Sender<InstallDone>,
    done_rx: Receiver<InstallDone>,
    pending: bool,
}

impl Dispatcher {
    pub fn new(
        manager: Arc<Mutex<ModManager>>,
        installer: Box<dyn Installer>,
        reply_tx: Sender<Reply>,
    ) -> Self {
        let (done_tx, done_rx) = mpsc::channel();
        Self {
            manager,
            installer,
            reply_tx,
            done_tx,
            done_rx,
            pending: false,
        }
    }

    pub fn handle_raw(&mut self, raw: &str) -> Result<()> {
        let command: Command =
            serde_json::from_str(raw).map_err(|err| Error::Command(err.to_string()))?;
        self.handle_command(command)
    }

    pub fn handle_command(&mut self, command: Command) -> Result<()> {
        match command {
            Command::InstallMod { url, mod_ref } => {
                if self.pending {
                    warn!(name = %mod_ref.name, "install rejected, another is pending");
                    return Err(Error::Command("install already in progress".to_string()));
                }
                info!(name = %mod_ref.name, version = %mod_ref.version, "install requested");
                self.installer.install_mod(
                    &mod_ref.name,
                    &mod_ref.version,
                    &url,
                    self.done_tx.clone(),
                )?;
                self.pending = true;
                Ok(())
            }
            Command::SetMod { mod_ref } => {
                self.manager.lock().unwrap().set_mod(&mod_ref.name)?;
                self.send_ready();
                Ok(())
            }
            Command::DeleteMod { mod_ref } => {
                self.manager.lock().unwrap().delete_mod(&mod_ref.name)?;
                self.send_ready();
                Ok(())
            }
            Command::DeleteMods => {
                self.manager.lock().unwrap().delete_mods()?;
                self.send_ready();
                Ok(())
            }
        }
    }

    pub fn install_pending(&self) -> bool {
        self.pending
    }

    // Drains installer completions without blocking and emits one ready reply
    // per completed request. Returns how many replies were sent.
    pub fn pump(&mut self) -> usize {
        let mut delivered = 0;
        while let Ok(done) = self.done_rx.try_recv() {
            if !self.pending {
                warn!(name = %done.name, "stray install completion dropped");
                continue;
            }
            info!(name = %done.name, "install completed");
            self.pending = false;
            self.send_ready();
            delivered += 1;
        }
        delivered
    }

    // Blocks until the outstanding install completes. There is no timeout
    // contract: a request either completes or never signals.
    pub fn await_ready(&mut self) -> Result<()> {
        if !self.pending {
            return Ok(());
        }
        let done = self
            .done_rx
            .recv()
            .map_err(|err| Error::Command(err.to_string()))?;
        info!(name = %done.name, "install completed");
        self.pending = false;
        self.send_ready();
        Ok(())
    }

    fn send_ready(&self) {
        let _ = self.reply_tx.send(Reply::Ready);
    }
}
