//! Systems: named units of per-tick logic.
//!
//! A system is identified by its name. During `update` it receives a
//! [`SystemContext`] giving mutable access to the world data and a way to
//! register or unregister other systems.

use std::fmt;
use std::marker::PhantomData;
use std::ops::{Deref, DerefMut};

use stratum_foundation::{Error, ErrorKind, Result};

/// Per-tick logic run by the [`crate::SystemManager`].
///
/// `C` is the data the system operates on, usually a
/// [`stratum_storage::Store`].
pub trait System<C> {
    /// Returns the unique name of this system.
    fn name(&self) -> &str;

    /// Called once when the system is registered.
    ///
    /// # Errors
    ///
    /// A failing setup aborts the registration.
    fn setup(&mut self) -> Result<()> {
        Ok(())
    }

    /// Called once per pass with the elapsed time.
    ///
    /// # Errors
    ///
    /// A failure stops the pass and is returned from `run_all`.
    fn update(&mut self, ctx: &mut SystemContext<'_, C>, delta_time: f64) -> Result<()>;

    /// Called once when the system is unregistered or torn down.
    ///
    /// # Errors
    ///
    /// Teardown failures are reported; the system is removed regardless.
    fn teardown(&mut self) -> Result<()> {
        Ok(())
    }
}

type Hook = Box<dyn FnMut() -> Result<()>>;

/// A system built from a closure.
pub struct FnSystem<C, F> {
    name: String,
    update: F,
    setup: Option<Hook>,
    teardown: Option<Hook>,
    _data: PhantomData<fn(&mut C)>,
}

impl<C, F> FnSystem<C, F>
where
    F: FnMut(&mut SystemContext<'_, C>, f64) -> Result<()>,
{
    /// Creates a system that runs `update` every pass.
    pub fn new(name: impl Into<String>, update: F) -> Self {
        Self {
            name: name.into(),
            update,
            setup: None,
            teardown: None,
            _data: PhantomData,
        }
    }

    /// Adds a setup hook.
    #[must_use]
    pub fn with_setup(mut self, hook: impl FnMut() -> Result<()> + 'static) -> Self {
        self.setup = Some(Box::new(hook));
        self
    }

    /// Adds a teardown hook.
    #[must_use]
    pub fn with_teardown(mut self, hook: impl FnMut() -> Result<()> + 'static) -> Self {
        self.teardown = Some(Box::new(hook));
        self
    }
}

impl<C, F> System<C> for FnSystem<C, F>
where
    F: FnMut(&mut SystemContext<'_, C>, f64) -> Result<()>,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn setup(&mut self) -> Result<()> {
        self.setup.as_mut().map_or(Ok(()), |hook| hook())
    }

    fn update(&mut self, ctx: &mut SystemContext<'_, C>, delta_time: f64) -> Result<()> {
        (self.update)(ctx, delta_time)
    }

    fn teardown(&mut self) -> Result<()> {
        self.teardown.as_mut().map_or(Ok(()), |hook| hook())
    }
}

impl<C, F> fmt::Debug for FnSystem<C, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnSystem").field("name", &self.name).finish_non_exhaustive()
    }
}

/// A registry change requested by a running system.
pub(crate) enum Command<C> {
    Register {
        system: Box<dyn System<C>>,
        priority: i32,
    },
    Unregister(String),
}

/// What a system sees while it runs.
///
/// Dereferences to the world data. Registry changes are checked right
/// away and applied as soon as the current system's update returns.
pub struct SystemContext<'a, C> {
    data: &'a mut C,
    /// Registered names as they will be once queued commands apply.
    registered: Vec<String>,
    commands: Vec<Command<C>>,
}

impl<'a, C> SystemContext<'a, C> {
    pub(crate) fn new(data: &'a mut C, registered: Vec<String>) -> Self {
        Self {
            data,
            registered,
            commands: Vec::new(),
        }
    }

    pub(crate) fn into_commands(self) -> Vec<Command<C>> {
        self.commands
    }

    /// Returns the world data.
    pub fn data(&mut self) -> &mut C {
        &mut *self.data
    }

    /// Registers another system. Its setup runs once this system's update
    /// returns, and it first updates on the next pass.
    ///
    /// # Errors
    ///
    /// Returns `SystemAlreadyRegistered` if the name is taken.
    pub fn register<S: System<C> + 'static>(&mut self, system: S, priority: i32) -> Result<()> {
        let name = system.name().to_string();
        if self.has_system(&name) {
            return Err(Error::new(ErrorKind::SystemAlreadyRegistered(name)));
        }
        self.registered.push(name);
        self.commands.push(Command::Register {
            system: Box::new(system),
            priority,
        });
        Ok(())
    }

    /// Unregisters a system. If it has not had its turn in this pass yet,
    /// it is skipped.
    ///
    /// # Errors
    ///
    /// Returns `SystemNotRegistered` if no such system is registered.
    pub fn unregister(&mut self, name: &str) -> Result<()> {
        let Some(pos) = self.registered.iter().position(|n| n == name) else {
            return Err(Error::new(ErrorKind::SystemNotRegistered(name.to_string())));
        };
        self.registered.remove(pos);
        self.commands.push(Command::Unregister(name.to_string()));
        Ok(())
    }

    /// Checks whether a system is registered, counting changes queued by
    /// this context.
    #[must_use]
    pub fn has_system(&self, name: &str) -> bool {
        self.registered.iter().any(|n| n == name)
    }
}

impl<C> Deref for SystemContext<'_, C> {
    type Target = C;

    fn deref(&self) -> &C {
        &*self.data
    }
}

impl<C> DerefMut for SystemContext<'_, C> {
    fn deref_mut(&mut self) -> &mut C {
        &mut *self.data
    }
}
