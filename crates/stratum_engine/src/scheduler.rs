//! Ordered registry and execution of systems.
//!
//! Systems run highest priority first; equal priorities keep registration
//! order. A pass iterates a snapshot of the registry taken when it starts:
//! systems registered during the pass wait for the next one, and systems
//! unregistered during the pass are skipped if their turn has not come.

use std::fmt;

use stratum_foundation::{Error, ErrorContext, ErrorKind, Result, TeardownFailure};
use tracing::{debug, trace, warn};

use crate::system::{Command, System, SystemContext};

struct Entry<C> {
    /// Registration sequence number; distinguishes a re-registered name.
    seq: u64,
    name: String,
    priority: i32,
    /// Taken out while the system's update runs.
    system: Option<Box<dyn System<C>>>,
}

/// Runs registered systems in priority order.
pub struct SystemManager<C> {
    entries: Vec<Entry<C>>,
    next_seq: u64,
}

impl<C> Default for SystemManager<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> SystemManager<C> {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            next_seq: 0,
        }
    }

    /// Registers a system and runs its setup hook.
    ///
    /// # Errors
    ///
    /// Returns `SystemAlreadyRegistered` if the name is taken, or the setup
    /// hook's error, in which case the system is not registered.
    pub fn register<S: System<C> + 'static>(&mut self, system: S, priority: i32) -> Result<()> {
        self.register_boxed(Box::new(system), priority)
    }

    /// Registers an already boxed system.
    ///
    /// # Errors
    ///
    /// See [`SystemManager::register`].
    pub fn register_boxed(&mut self, mut system: Box<dyn System<C>>, priority: i32) -> Result<()> {
        let name = system.name().to_string();
        if self.has_system(&name) {
            return Err(Error::new(ErrorKind::SystemAlreadyRegistered(name)));
        }
        system.setup().map_err(|e| {
            e.with_context(ErrorContext::new().with_operation("setup").with_system(&name))
        })?;

        let pos = self
            .entries
            .iter()
            .position(|entry| entry.priority < priority)
            .unwrap_or(self.entries.len());
        debug!(system = %name, priority, position = pos, "system registered");
        self.entries.insert(
            pos,
            Entry {
                seq: self.next_seq,
                name,
                priority,
                system: Some(system),
            },
        );
        self.next_seq += 1;
        Ok(())
    }

    /// Runs a system's teardown hook and removes it.
    ///
    /// The system is removed even if its teardown fails.
    ///
    /// # Errors
    ///
    /// Returns `SystemNotRegistered`, or the teardown hook's error.
    pub fn unregister(&mut self, name: &str) -> Result<()> {
        let pos = self
            .position(name)
            .ok_or_else(|| Error::new(ErrorKind::SystemNotRegistered(name.to_string())))?;
        let entry = self.entries.remove(pos);
        debug!(system = %name, "system unregistered");

        match entry.system {
            Some(mut system) => system.teardown().map_err(|e| {
                e.with_context(ErrorContext::new().with_operation("teardown").with_system(name))
            }),
            None => Ok(()),
        }
    }

    /// Checks whether a system is registered.
    #[must_use]
    pub fn has_system(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// Returns the registered names in execution order.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.name.clone()).collect()
    }

    /// Returns the number of registered systems.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no system is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Runs one pass: every system registered when the pass starts, in
    /// order, unless it was unregistered before its turn.
    ///
    /// Registry changes a system requests are applied as soon as its
    /// update returns.
    ///
    /// # Errors
    ///
    /// Stops at the first failing update (after applying that system's
    /// requested changes) and returns its error. A registry change that
    /// fails, such as a setup hook of a system registered mid-pass, does not
    /// stop the pass; the first such failure is returned once it completes.
    pub fn run_all(&mut self, data: &mut C, delta_time: f64) -> Result<()> {
        let snapshot: Vec<u64> = self.entries.iter().map(|e| e.seq).collect();
        let mut deferred = None;

        for seq in snapshot {
            let Some(pos) = self.entries.iter().position(|e| e.seq == seq) else {
                continue;
            };
            let Some(mut system) = self.entries[pos].system.take() else {
                continue;
            };
            let name = self.entries[pos].name.clone();

            trace!(system = %name, delta_time, "system update");
            let mut ctx = SystemContext::new(data, self.names());
            let outcome = system.update(&mut ctx, delta_time);
            let commands = ctx.into_commands();

            if let Some(entry) = self.entries.iter_mut().find(|e| e.seq == seq) {
                entry.system = Some(system);
            }
            let applied = self.apply(commands);

            outcome.map_err(|e| {
                e.with_context(ErrorContext::new().with_operation("update").with_system(&name))
            })?;
            if let Err(error) = applied {
                warn!(system = %name, %error, "registry change failed");
                deferred.get_or_insert(error);
            }
        }

        deferred.map_or(Ok(()), Err)
    }

    /// Runs every teardown hook and clears the registry.
    ///
    /// # Errors
    ///
    /// Returns `TeardownFailed` listing every hook that failed; the
    /// registry is cleared either way.
    pub fn teardown_all(&mut self) -> Result<()> {
        let mut failures = Vec::new();

        for entry in self.entries.drain(..) {
            let Some(mut system) = entry.system else {
                continue;
            };
            if let Err(error) = system.teardown() {
                warn!(system = %entry.name, %error, "system teardown failed");
                failures.push(TeardownFailure {
                    system: entry.name,
                    error: Box::new(error),
                });
            }
        }

        if failures.is_empty() {
            Ok(())
        } else {
            Err(Error::new(ErrorKind::TeardownFailed(failures)))
        }
    }

    /// Applies queued registry changes in order, reporting the first failure
    /// after attempting all of them.
    fn apply(&mut self, commands: Vec<Command<C>>) -> Result<()> {
        let mut first = None;
        for command in commands {
            let result = match command {
                Command::Register { system, priority } => self.register_boxed(system, priority),
                Command::Unregister(name) => self.unregister(&name),
            };
            if let Err(e) = result {
                first.get_or_insert(e);
            }
        }
        first.map_or(Ok(()), Err)
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.name == name)
    }
}

impl<C> fmt::Debug for SystemManager<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SystemManager")
            .field("systems", &self.names())
            .finish()
    }
}
