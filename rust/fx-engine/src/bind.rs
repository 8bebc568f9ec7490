//! Binding a program to the capability object it runs against.

use crate::{FxError, Program, RunHandle, RunSettings, run_with};
use std::fmt::{Debug, Formatter};
use std::sync::Arc;
use tracing::debug;

/// A program coupled with a capability object that satisfies its declared
/// requirements. Only bound programs can run.
pub struct Bound<C: 'static, T> {
    program: Program<C, T>,
    capabilities: Arc<C>,
}

impl<C: 'static, T> Bound<C, T> {
    /// The capability object the program will run against.
    pub fn capabilities(&self) -> &Arc<C> {
        &self.capabilities
    }

    pub(crate) fn into_parts(self) -> (Program<C, T>, Arc<C>) {
        (self.program, self.capabilities)
    }
}

impl<C, T> Bound<C, T>
where
    C: Send + Sync + 'static,
    T: Send + 'static,
{
    /// Start the program with default settings. See [`run`](crate::run).
    pub fn run(self) -> RunHandle<T> {
        run_with(self, RunSettings::default())
    }

    /// Start the program with `settings`.
    pub fn run_with(self, settings: RunSettings) -> RunHandle<T> {
        run_with(self, settings)
    }
}

impl<C: 'static, T> Debug for Bound<C, T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bound")
            .field("program", &self.program)
            .finish_non_exhaustive()
    }
}

/// Couple `program` with the capability object it will run against.
///
/// Shapes used through [`op`](crate::op) are already checked by the
/// compiler for concrete capability types. Binding additionally checks the
/// program's declared requirements against the actual object and fails with
/// [`FxError::MissingCapability`] on the first absent one. Nothing is
/// executed.
pub fn bind<C, T>(
    program: Program<C, T>,
    capabilities: impl Into<Arc<C>>,
) -> Result<Bound<C, T>, FxError>
where
    C: 'static,
    T: 'static,
{
    let capabilities = capabilities.into();

    if let Err(missing) = program.requirements().check(&*capabilities) {
        debug!(operation = %missing.operation, "binding rejected");
        return Err(missing.into());
    }

    Ok(Bound {
        program,
        capabilities,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Resumption, op};
    use fx_capability::{Capabilities, Shape};
    use pretty_assertions::assert_eq;
    use std::sync::atomic::{AtomicBool, Ordering};

    trait Beep: Send + Sync {
        fn beep(&self) -> Resumption<()>;
    }

    impl Shape for dyn Beep {
        const NAME: &'static str = "beep";
    }

    struct Speaker;

    impl Beep for Speaker {
        fn beep(&self) -> Resumption<()> {
            Resumption::immediate(())
        }
    }

    fn beeping(started: Arc<AtomicBool>) -> Program<Capabilities, ()> {
        Program::new(move |co| async move {
            started.store(true, Ordering::SeqCst);
            co.perform(op::<dyn Beep, _, _, _>(|speaker| speaker.beep())).await
        })
        .requires::<dyn Beep>()
    }

    #[fx_macros::test]
    fn it_binds_when_requirements_are_met() -> anyhow::Result<()> {
        let started = Arc::new(AtomicBool::new(false));
        let capabilities = Capabilities::new().with::<dyn Beep>(Arc::new(Speaker));

        let bound = bind(beeping(started.clone()), capabilities)?;

        assert_eq!(bound.capabilities().operations(), vec!["beep"]);
        assert!(!started.load(Ordering::SeqCst));
        Ok(())
    }

    #[fx_macros::test]
    fn it_rejects_missing_capabilities_without_stepping() {
        let started = Arc::new(AtomicBool::new(false));

        let error = bind(beeping(started.clone()), Capabilities::new()).err();

        assert_eq!(
            error.as_ref().and_then(FxError::missing_operation),
            Some("beep")
        );
        assert!(!started.load(Ordering::SeqCst));
    }

    #[fx_macros::test]
    fn it_accepts_shared_capability_objects() -> anyhow::Result<()> {
        let capabilities = Arc::new(Capabilities::new().with::<dyn Beep>(Arc::new(Speaker)));

        let first = beeping(Arc::new(AtomicBool::new(false))).bind(capabilities.clone())?;
        let second = beeping(Arc::new(AtomicBool::new(false))).bind(capabilities.clone())?;

        assert!(Arc::ptr_eq(first.capabilities(), second.capabilities()));
        Ok(())
    }
}
