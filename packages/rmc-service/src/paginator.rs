use std::sync::{Mutex, MutexGuard};

use rmc_api::{ApiClient, Envelope, FetchError, Request, Resource};

/// Result of one `load` or `fetch_more` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
	/// Another fetch was in flight or there is no next page. No call was made.
	Skipped,
	Fetched { received: usize },
	Failed,
}

/// Delivered to listeners after the paginator state has been updated.
#[derive(Debug, Clone, PartialEq)]
pub enum PageEvent<T> {
	/// Full accumulated sequence, not just the newest page.
	Loaded { items: Vec<T>, has_more: bool },
	Failed { error: FetchError },
}

type Listener<T> = Box<dyn Fn(&PageEvent<T>) + Send + Sync>;

#[derive(Clone, Copy)]
enum Merge {
	Replace,
	Append,
}

struct PageState<T> {
	items: Vec<T>,
	next: Option<String>,
	total: Option<u64>,
	in_flight: bool,
}

/// Held across the network await. Clears the in-flight flag if the fetch future is dropped
/// before it settles, so a cancelled call does not block later ones.
struct InFlight<'a, T> {
	state: &'a Mutex<PageState<T>>,
	armed: bool,
}
impl<T> InFlight<'_, T> {
	fn disarm(mut self) {
		self.armed = false;
	}
}
impl<T> Drop for InFlight<'_, T> {
	fn drop(&mut self) {
		if self.armed {
			self.state.lock().unwrap_or_else(|err| err.into_inner()).in_flight = false;

			tracing::debug!("Catalog page fetch dropped before settling.");
		}
	}
}

/// Incremental page fetcher for one list or search session.
///
/// At most one network call is in flight per paginator: the in-flight flag is set before the
/// first await, so a call polled concurrently sees it and returns [`FetchOutcome::Skipped`].
/// Pages are appended in arrival order without deduplication.
pub struct Paginator<T> {
	client: ApiClient,
	state: Mutex<PageState<T>>,
	listeners: Mutex<Vec<Listener<T>>>,
}
impl<T> Paginator<T>
where
	T: Resource,
{
	pub fn new(client: ApiClient) -> Self {
		let state = PageState { items: Vec::new(), next: None, total: None, in_flight: false };

		Self::with_state(client, state)
	}

	/// Starts a session from an already decoded first page.
	pub fn seeded(client: ApiClient, envelope: Envelope<T>) -> Self {
		let Envelope { info, results } = envelope;

		Self::with_state(
			client,
			PageState {
				items: results,
				next: info.next,
				total: Some(info.count),
				in_flight: false,
			},
		)
	}

	/// Registers a listener. Listeners run on the task that completed the fetch and must not
	/// register further listeners from inside the callback.
	pub fn on_update<F>(&self, listener: F)
	where
		F: Fn(&PageEvent<T>) + Send + Sync + 'static,
	{
		self.listeners.lock().unwrap_or_else(|err| err.into_inner()).push(Box::new(listener));
	}

	/// Initial load. Replaces everything accumulated so far and the cursor.
	pub async fn load(&self, request: &Request) -> FetchOutcome {
		let Some(in_flight) = self.try_begin() else {
			tracing::debug!(kind = %T::KIND, "Initial load skipped; a fetch is in flight.");

			return FetchOutcome::Skipped;
		};
		let result = self.client.execute::<Envelope<T>>(request).await;

		self.finish(in_flight, result, Merge::Replace)
	}

	/// Fetches the page behind the current `next` cursor and appends it.
	pub async fn fetch_more(&self) -> FetchOutcome {
		let request = {
			let mut state = self.lock();

			if state.in_flight {
				return FetchOutcome::Skipped;
			}

			let Some(next) = state.next.as_deref() else {
				return FetchOutcome::Skipped;
			};
			let request = Request::from_cursor(T::KIND, next);

			state.in_flight = true;

			request
		};
		let in_flight = InFlight { state: &self.state, armed: true };
		let result = self.client.execute::<Envelope<T>>(&request).await;

		self.finish(in_flight, result, Merge::Append)
	}

	pub fn should_show_load_more_indicator(&self) -> bool {
		self.lock().next.is_some()
	}

	pub fn is_fetching_more(&self) -> bool {
		self.lock().in_flight
	}

	pub fn items(&self) -> Vec<T> {
		self.lock().items.clone()
	}

	pub fn item(&self, index: usize) -> Option<T> {
		self.lock().items.get(index).cloned()
	}

	pub fn len(&self) -> usize {
		self.lock().items.len()
	}

	pub fn is_empty(&self) -> bool {
		self.lock().items.is_empty()
	}

	pub fn next_cursor(&self) -> Option<String> {
		self.lock().next.clone()
	}

	/// `info.count` of the most recent page, i.e. the server-side total.
	pub fn total_count(&self) -> Option<u64> {
		self.lock().total
	}

	fn with_state(client: ApiClient, state: PageState<T>) -> Self {
		Self { client, state: Mutex::new(state), listeners: Mutex::new(Vec::new()) }
	}

	fn lock(&self) -> MutexGuard<'_, PageState<T>> {
		self.state.lock().unwrap_or_else(|err| err.into_inner())
	}

	fn try_begin(&self) -> Option<InFlight<'_, T>> {
		let mut state = self.lock();

		if state.in_flight {
			return None;
		}

		state.in_flight = true;

		Some(InFlight { state: &self.state, armed: true })
	}

	fn finish(
		&self,
		in_flight: InFlight<'_, T>,
		result: Result<Envelope<T>, FetchError>,
		merge: Merge,
	) -> FetchOutcome {
		let (event, outcome) = {
			let mut state = self.lock();

			in_flight.disarm();
			state.in_flight = false;

			match result {
				Ok(Envelope { info, results }) => {
					let received = results.len();

					match merge {
						Merge::Replace => state.items = results,
						Merge::Append => state.items.extend(results),
					}

					state.next = info.next;
					state.total = Some(info.count);

					tracing::debug!(
						kind = %T::KIND,
						received,
						accumulated = state.items.len(),
						has_more = state.next.is_some(),
						"Catalog page merged."
					);

					let has_more = state.next.is_some();

					(
						PageEvent::Loaded { items: state.items.clone(), has_more },
						FetchOutcome::Fetched { received },
					)
				},
				Err(error) => {
					tracing::warn!(kind = %T::KIND, error = %error, "Catalog page fetch failed.");

					(PageEvent::Failed { error }, FetchOutcome::Failed)
				},
			}
		};

		self.notify(&event);

		outcome
	}

	fn notify(&self, event: &PageEvent<T>) {
		let listeners = self.listeners.lock().unwrap_or_else(|err| err.into_inner());

		for listener in listeners.iter() {
			listener(event);
		}
	}
}
