use std::marker::PhantomData;
use std::sync::{Arc, Mutex, PoisonError};

use crate::core::errors::Result;
use crate::models::Query;
use crate::stream::Observable;
use crate::ui::surface::{Control, Listener, ListenerId, TextInput};

/// Unopened binding to one control.
///
/// `open` consumes the source, so a second listener can never be attached through
/// the same binding; the returned [`Registration`] is the only way to detach it.
pub struct EventSource<E, C: Control<E> + ?Sized> {
    control: Arc<C>,
    _event: PhantomData<fn(E)>,
}

impl<E, C: Control<E> + ?Sized> EventSource<E, C> {
    pub fn new(control: Arc<C>) -> Self {
        Self {
            control,
            _event: PhantomData,
        }
    }

    pub fn open(self, listener: Listener<E>) -> Result<Registration<E, C>> {
        let name = self.control.name();
        let id = self.control.register(listener).map_err(|e| {
            tracing::warn!("Failed to attach to {}: {}", name, e);
            e
        })?;
        tracing::debug!(control = name, id, "listener attached");
        Ok(Registration {
            control: self.control,
            id: Mutex::new(Some(id)),
            _event: PhantomData,
        })
    }
}

/// A live listener on a control. Closing is idempotent and also happens on drop.
pub struct Registration<E, C: Control<E> + ?Sized> {
    control: Arc<C>,
    id: Mutex<Option<ListenerId>>,
    _event: PhantomData<fn(E)>,
}

impl<E, C: Control<E> + ?Sized> Registration<E, C> {
    pub fn close(&self) {
        let id = self.id.lock().unwrap_or_else(PoisonError::into_inner).take();
        if let Some(id) = id {
            self.control.deregister(id);
            tracing::debug!(control = self.control.name(), id, "listener detached");
        }
    }

    pub fn is_open(&self) -> bool {
        self.id
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }
}

impl<E, C: Control<E> + ?Sized> Drop for Registration<E, C> {
    fn drop(&mut self) {
        self.close();
    }
}

/// Every edit of `input`, unfiltered. Each subscription attaches its own listener and
/// detaches it on dispose.
pub fn text_changes<I>(input: Arc<I>) -> Observable<Query>
where
    I: TextInput + ?Sized + 'static,
{
    Observable::create(move |emitter| {
        let forward = emitter.clone();
        let registration = EventSource::<String, I>::new(Arc::clone(&input))
            .open(Arc::new(move |text: String| forward.next(text)))?;
        emitter.on_dispose(move || registration.close());
        Ok(())
    })
}

/// The current contents of `input` each time `trigger` fires.
pub fn trigger_queries<C, I>(trigger: Arc<C>, input: Arc<I>) -> Observable<Query>
where
    C: Control<()> + ?Sized + 'static,
    I: TextInput + ?Sized + 'static,
{
    Observable::create(move |emitter| {
        let forward = emitter.clone();
        let input = Arc::clone(&input);
        let registration = EventSource::<(), C>::new(Arc::clone(&trigger))
            .open(Arc::new(move |()| forward.next(input.text())))?;
        emitter.on_dispose(move || registration.close());
        Ok(())
    })
}
