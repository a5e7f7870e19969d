use std::sync::Arc;

use tokio::sync::OnceCell;

use crate::{BoxFuture, Result};

type InitFn<T> = Box<dyn Fn() -> BoxFuture<'static, Result<Arc<T>>> + Send + Sync>;

/// A shared collaborator built on first use.
///
/// Concurrent first callers share one construction. A failed construction leaves the cell empty,
/// so the next caller tries again.
pub struct LazyResource<T>
where
	T: ?Sized,
{
	name: &'static str,
	cell: OnceCell<Arc<T>>,
	init: InitFn<T>,
}
impl<T> LazyResource<T>
where
	T: ?Sized + Send + Sync + 'static,
{
	pub fn new<F>(name: &'static str, init: F) -> Self
	where
		F: Fn() -> BoxFuture<'static, Result<Arc<T>>> + Send + Sync + 'static,
	{
		Self { name, cell: OnceCell::new(), init: Box::new(init) }
	}

	/// Wraps an already constructed value.
	pub fn ready(name: &'static str, value: Arc<T>) -> Self {
		let cell = OnceCell::new_with(Some(value.clone()));
		let init: InitFn<T> = Box::new(move || {
			let value = value.clone();

			Box::pin(async move { Ok(value) })
		});

		Self { name, cell, init }
	}

	pub async fn get(&self) -> Result<Arc<T>> {
		let value = self
			.cell
			.get_or_try_init(|| async {
				let result = (self.init)().await;

				match &result {
					Ok(_) => tracing::info!(resource = self.name, "Initialized shared resource."),
					Err(err) => tracing::warn!(
						resource = self.name,
						error = %err,
						"Failed to initialize shared resource."
					),
				}

				result
			})
			.await?;

		Ok(value.clone())
	}

	pub fn is_initialized(&self) -> bool {
		self.cell.initialized()
	}
}
