//! # Stack Controller
//!
//! Turns navigation intents into stack mutations.
//!
//! Every intent that needs provider data runs in three phases:
//!
//! ```text
//! begin_*()  ──►  Ticket::load()  ──►  commit()
//!  validate        provider call        staleness check
//!  compute code    (no stack access)    push
//! ```
//!
//! `begin_*` rejects invalid transitions before anything is fetched. `commit`
//! only pushes when the ticket is still current: the stack has not changed
//! since the ticket was issued and no newer request has been begun. A stale
//! result is dropped with [`NavError::Superseded`]. The async methods
//! (`open_root`, `drill`, ...) chain all three phases for callers that do not
//! need to interleave them.

use std::collections::BTreeSet;
use std::sync::Arc;

use log::{debug, info, warn};

use crate::catalogue::{CatalogueOption, CatalogueProvider, DetailRecord};
use crate::core::code;
use crate::core::error::NavError;
use crate::core::stack::{NavigationStack, StackEntry};
use crate::core::step::{SideCategory, StepKind};

/// Progress of the most recently begun request.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum RequestStatus {
    #[default]
    Idle,
    Loading(StepKind),
    Ready,
    Error(String),
}

/// What a ticket asks the provider for.
#[derive(Debug, Clone, Copy, PartialEq)]
enum LoadRequest {
    Options(StepKind),
    Detail,
}

/// Data returned for a ticket.
#[derive(Debug, Clone, PartialEq)]
pub enum Loaded {
    Options(Vec<CatalogueOption>),
    Detail(DetailRecord),
}

/// A pending step: everything needed to push it once its data has loaded.
#[derive(Debug, Clone)]
pub struct Ticket {
    request_id: u64,
    generation: u64,
    kind: StepKind,
    title: String,
    code: String,
    consumed: BTreeSet<SideCategory>,
    request: LoadRequest,
    replaces_stack: bool,
}

impl Ticket {
    pub fn kind(&self) -> StepKind {
        self.kind
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Fetches this step's data. Touches only the provider.
    pub async fn load(&self, provider: &dyn CatalogueProvider) -> Result<Loaded, NavError> {
        debug!(
            "Loading {} at '{}' from provider {}",
            self.kind,
            self.code,
            provider.name()
        );
        let result = match self.request {
            LoadRequest::Options(kind) => provider
                .fetch_options(kind, &self.code)
                .await
                .map(Loaded::Options),
            LoadRequest::Detail => provider.fetch_detail(&self.code).await.map(Loaded::Detail),
        };
        result.map_err(|source| NavError::ProviderFetch {
            step: self.kind,
            parent_code: self.code.clone(),
            source,
        })
    }

    fn into_entry(self, loaded: Loaded) -> StackEntry {
        let (options, detail) = match loaded {
            Loaded::Options(options) => (options, None),
            Loaded::Detail(record) => (Vec::new(), Some(record)),
        };
        StackEntry {
            kind: self.kind,
            title: self.title,
            options,
            code: self.code,
            consumed_side_categories: self.consumed,
            detail,
        }
    }
}

/// A pending restore. The path is replayed elsewhere and handed back to
/// [`StackController::commit_restore`], which applies the same staleness
/// rule as [`StackController::commit`].
#[derive(Debug, Clone)]
pub struct RestoreTicket {
    request_id: u64,
    generation: u64,
    code: String,
}

impl RestoreTicket {
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Rebuilds the path on a scratch controller. Touches only the provider.
    pub async fn replay(
        &self,
        provider: Arc<dyn CatalogueProvider>,
    ) -> Result<NavigationStack, NavError> {
        let mut scratch = StackController::new(provider);
        scratch.replay(&self.code).await?;
        Ok(scratch.into_stack())
    }
}

pub struct StackController {
    provider: Arc<dyn CatalogueProvider>,
    stack: NavigationStack,
    next_request_id: u64,
    latest_request: Option<u64>,
    status: RequestStatus,
}

impl StackController {
    pub fn new(provider: Arc<dyn CatalogueProvider>) -> Self {
        Self {
            provider,
            stack: NavigationStack::new(),
            next_request_id: 0,
            latest_request: None,
            status: RequestStatus::Idle,
        }
    }

    pub fn provider(&self) -> Arc<dyn CatalogueProvider> {
        self.provider.clone()
    }

    pub fn current_stack(&self) -> &[StackEntry] {
        self.stack.entries()
    }

    pub fn stack(&self) -> &NavigationStack {
        &self.stack
    }

    pub fn top(&self) -> Option<&StackEntry> {
        self.stack.top()
    }

    pub fn depth(&self) -> usize {
        self.stack.depth()
    }

    pub fn request_status(&self) -> &RequestStatus {
        &self.status
    }

    // ------------------------------------------------------------------------
    // Phase 1: begin
    // ------------------------------------------------------------------------

    /// Opens `root` as a fresh path. The current stack is replaced on commit.
    pub fn begin_open_root(&mut self, root: &CatalogueOption) -> Ticket {
        let code = code::build_code("", StepKind::Country, root);
        self.issue(
            StepKind::Country,
            root.label.clone(),
            code,
            BTreeSet::new(),
            LoadRequest::Options(StepKind::Series),
            true,
        )
    }

    /// Drills into `option` as the step that follows the top frame.
    pub fn begin_drill(&mut self, option: &CatalogueOption) -> Result<Ticket, NavError> {
        let top = self.stack.top().ok_or(NavError::InvalidTransition {
            from: None,
            to: None,
        })?;
        let target = top.kind.child_kind().ok_or(NavError::InvalidTransition {
            from: Some(top.kind),
            to: None,
        })?;
        self.begin_drill_to(target, option)
    }

    /// Drills into `option` as a step of `kind`, which must be the step that
    /// follows the top frame.
    pub fn begin_drill_to(
        &mut self,
        kind: StepKind,
        option: &CatalogueOption,
    ) -> Result<Ticket, NavError> {
        let top = self.stack.top().ok_or(NavError::InvalidTransition {
            from: None,
            to: Some(kind),
        })?;
        if kind.is_side_category() || !top.kind.accepts_child(kind) {
            return Err(NavError::InvalidTransition {
                from: Some(top.kind),
                to: Some(kind),
            });
        }

        let code = code::build_code(&top.code, kind, option);
        let consumed = top.consumed_side_categories.clone();
        let request = match kind.child_kind() {
            Some(child) => LoadRequest::Options(child),
            None => LoadRequest::Detail,
        };
        Ok(self.issue(kind, option.label.clone(), code, consumed, request, false))
    }

    /// Opens a stamp's detail view from an `ItemType` or side-category frame.
    pub fn begin_select_detail(&mut self, option: &CatalogueOption) -> Result<Ticket, NavError> {
        self.begin_drill_to(StepKind::StampDetail, option)
    }

    /// Branches into `category` from the top frame.
    pub fn begin_side_category(&mut self, category: SideCategory) -> Result<Ticket, NavError> {
        let kind = StepKind::SideCategory(category);
        let top = self.stack.top().ok_or(NavError::InvalidTransition {
            from: None,
            to: Some(kind),
        })?;
        if top.has_consumed(category) {
            return Err(NavError::DuplicateCategory(category));
        }

        let code = code::append_segment(&top.code, &code::side_segment(category));
        let mut consumed = top.consumed_side_categories.clone();
        consumed.insert(category);
        Ok(self.issue(
            kind,
            category.label().to_string(),
            code,
            consumed,
            LoadRequest::Options(StepKind::StampDetail),
            false,
        ))
    }

    fn issue(
        &mut self,
        kind: StepKind,
        title: String,
        code: String,
        consumed: BTreeSet<SideCategory>,
        request: LoadRequest,
        replaces_stack: bool,
    ) -> Ticket {
        let request_id = self.claim(kind);
        info!("Begin {kind} at '{code}' (request {request_id})");
        Ticket {
            request_id,
            generation: self.stack.generation(),
            kind,
            title,
            code,
            consumed,
            request,
            replaces_stack,
        }
    }

    /// Makes a new request the latest one; anything begun earlier is stale.
    fn claim(&mut self, kind: StepKind) -> u64 {
        self.next_request_id += 1;
        let request_id = self.next_request_id;
        if let Some(previous) = self.latest_request.replace(request_id)
            && matches!(self.status, RequestStatus::Loading(_))
        {
            debug!("Request {previous} superseded by {request_id}");
        }
        self.status = RequestStatus::Loading(kind);
        request_id
    }

    /// Starts rebuilding the path for `code`. Requests begun before this one
    /// are stale, and so is this one once a newer request is begun or the
    /// stack changes.
    pub fn begin_restore(&mut self, code: &str) -> RestoreTicket {
        let request_id = self.claim(StepKind::Country);
        info!("Begin restore of '{code}' (request {request_id})");
        RestoreTicket {
            request_id,
            generation: self.stack.generation(),
            code: code.to_string(),
        }
    }

    // ------------------------------------------------------------------------
    // Phase 3: commit
    // ------------------------------------------------------------------------

    /// Whether `ticket` would still be accepted by [`commit`](Self::commit).
    pub fn is_current(&self, ticket: &Ticket) -> bool {
        self.is_latest(ticket.request_id, ticket.generation)
    }

    fn is_latest(&self, request_id: u64, generation: u64) -> bool {
        self.latest_request == Some(request_id) && self.stack.generation() == generation
    }

    /// Adopts a replayed stack if `ticket` is still the latest request and
    /// the stack has not changed since it was begun.
    pub fn commit_restore(
        &mut self,
        ticket: RestoreTicket,
        replayed: Result<NavigationStack, NavError>,
    ) -> Result<&StackEntry, NavError> {
        if !self.is_latest(ticket.request_id, ticket.generation) {
            debug!(
                "Discarding stale restore of '{}' (request {})",
                ticket.code, ticket.request_id
            );
            return Err(NavError::Superseded);
        }

        let stack = replayed.inspect_err(|e| {
            warn!("Restore of '{}' failed: {}", ticket.code, e);
            self.status = RequestStatus::Error(e.to_string());
        })?;

        self.adopt(stack);
        let top = self.stack.top().ok_or(NavError::EmptyStack)?;
        info!("Restored '{}' at depth {}", ticket.code, self.stack.depth());
        Ok(top)
    }

    /// Pushes the step described by `ticket` if it is still current.
    pub fn commit(
        &mut self,
        ticket: Ticket,
        loaded: Result<Loaded, NavError>,
    ) -> Result<&StackEntry, NavError> {
        if !self.is_current(&ticket) {
            debug!(
                "Discarding stale result for {} at '{}' (request {})",
                ticket.kind, ticket.code, ticket.request_id
            );
            return Err(NavError::Superseded);
        }

        let loaded = loaded.inspect_err(|e| {
            warn!("Navigation to '{}' failed: {}", ticket.code, e);
            self.status = RequestStatus::Error(e.to_string());
        })?;

        let replaces_stack = ticket.replaces_stack;
        let entry = ticket.into_entry(loaded);
        let pushed = if replaces_stack {
            self.stack.reset_to(entry)
        } else {
            self.stack.push(entry)
        };
        if let Err(e) = pushed {
            self.status = RequestStatus::Error(e.to_string());
            return Err(e);
        }

        self.status = RequestStatus::Ready;
        let top = self.stack.top().ok_or(NavError::EmptyStack)?;
        info!("Opened {} at '{}' (depth {})", top.kind, top.code, self.stack.depth());
        Ok(top)
    }

    // ------------------------------------------------------------------------
    // One-shot intents
    // ------------------------------------------------------------------------

    pub async fn open_root(&mut self, root: &CatalogueOption) -> Result<&StackEntry, NavError> {
        let ticket = self.begin_open_root(root);
        self.complete(ticket).await
    }

    pub async fn drill(&mut self, option: &CatalogueOption) -> Result<&StackEntry, NavError> {
        let ticket = self.begin_drill(option)?;
        self.complete(ticket).await
    }

    pub async fn drill_to(
        &mut self,
        kind: StepKind,
        option: &CatalogueOption,
    ) -> Result<&StackEntry, NavError> {
        let ticket = self.begin_drill_to(kind, option)?;
        self.complete(ticket).await
    }

    pub async fn drill_side_category(
        &mut self,
        category: SideCategory,
    ) -> Result<&StackEntry, NavError> {
        let ticket = self.begin_side_category(category)?;
        self.complete(ticket).await
    }

    pub async fn select_detail(
        &mut self,
        option: &CatalogueOption,
    ) -> Result<&StackEntry, NavError> {
        let ticket = self.begin_select_detail(option)?;
        self.complete(ticket).await
    }

    async fn complete(&mut self, ticket: Ticket) -> Result<&StackEntry, NavError> {
        let provider = self.provider.clone();
        let loaded = ticket.load(provider.as_ref()).await;
        self.commit(ticket, loaded)
    }

    /// Closes the top frame. Pending requests are cancelled even when there
    /// is nothing to close.
    pub fn close(&mut self) -> Result<StackEntry, NavError> {
        self.cancel_pending();
        let entry = self.stack.pop()?;
        debug!("Closed {} at '{}'", entry.kind, entry.code);
        Ok(entry)
    }

    /// Closes every frame and cancels pending requests.
    pub fn close_all(&mut self) {
        self.cancel_pending();
        debug!("Closing all {} frames", self.stack.depth());
        self.stack.clear();
    }

    fn cancel_pending(&mut self) {
        if let Some(request_id) = self.latest_request.take()
            && matches!(self.status, RequestStatus::Loading(_))
        {
            debug!("Request {request_id} cancelled");
            self.status = RequestStatus::Idle;
        }
    }

    /// Replaces the whole stack, e.g. with one rebuilt by `restore` on a
    /// scratch controller. Requests begun before this are stale.
    pub fn adopt(&mut self, stack: NavigationStack) {
        self.stack.adopt(stack);
        self.status = RequestStatus::Ready;
    }

    pub fn into_stack(self) -> NavigationStack {
        self.stack
    }

    // ------------------------------------------------------------------------
    // Root catalogue and restore
    // ------------------------------------------------------------------------

    /// The options a path can start from.
    pub async fn root_options(&self) -> Result<Vec<CatalogueOption>, NavError> {
        self.provider
            .fetch_options(StepKind::Country, "")
            .await
            .map_err(|source| NavError::ProviderFetch {
                step: StepKind::Country,
                parent_code: String::new(),
                source,
            })
    }

    /// Rebuilds the stack for `target` by replaying its segments.
    ///
    /// Marked segments open their side-category; every other segment is
    /// matched against the top frame's options by its canonical segment. The
    /// current stack is kept if any step fails.
    pub async fn restore(&mut self, target: &str) -> Result<&StackEntry, NavError> {
        let ticket = self.begin_restore(target);
        let replayed = ticket.replay(self.provider.clone()).await;
        self.commit_restore(ticket, replayed)
    }

    /// Replays `target` onto this controller, which must start empty.
    async fn replay(&mut self, target: &str) -> Result<(), NavError> {
        let not_found = |segment: &str| NavError::PathNotFound {
            code: target.to_string(),
            segment: segment.to_string(),
        };

        let segments = code::segments(target);
        let (root_segment, rest) = segments.split_first().ok_or_else(|| not_found(""))?;
        let root_segment = *root_segment;

        let roots = self.root_options().await?;
        let root = roots
            .iter()
            .find(|o| code::canonical_segment(StepKind::Country, o.segment.as_deref()) == root_segment)
            .ok_or_else(|| not_found(root_segment))?;
        self.open_root(root).await?;

        for &segment in rest {
            if segment.starts_with(code::SIDE_MARKER) {
                let category = code::parse_side_segment(segment).ok_or_else(|| not_found(segment))?;
                self.drill_side_category(category).await?;
                continue;
            }

            let top = self.top().ok_or(NavError::EmptyStack)?;
            let matched = top.kind.child_kind().and_then(|kind| {
                top.options
                    .iter()
                    .find(|o| code::canonical_segment(kind, o.segment.as_deref()) == segment)
                    .cloned()
            });
            let option = matched.ok_or_else(|| not_found(segment))?;
            self.drill(&option).await?;
        }
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Affordances for the presentation layer
    // ------------------------------------------------------------------------

    /// The kind a `drill` from the top frame would open.
    pub fn next_step_kind(&self) -> Option<StepKind> {
        self.stack.top().and_then(|top| top.kind.child_kind())
    }

    pub fn can_drill(&self) -> bool {
        self.next_step_kind().is_some()
    }

    pub fn can_select_detail(&self) -> bool {
        self.next_step_kind() == Some(StepKind::StampDetail)
    }

    pub fn can_close(&self) -> bool {
        !self.stack.is_empty()
    }

    /// Side-categories not yet entered on the current path.
    /// Empty when nothing is open.
    pub fn available_side_categories(&self) -> Vec<SideCategory> {
        match self.stack.top() {
            Some(top) => SideCategory::ALL
                .into_iter()
                .filter(|c| !top.has_consumed(*c))
                .collect(),
            None => Vec::new(),
        }
    }

    /// Titles of every open frame, root first.
    pub fn breadcrumb(&self) -> Vec<&str> {
        self.stack.entries().iter().map(|e| e.title.as_str()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalogue::ProviderError;
    use crate::test_support::{FailingProvider, nz_controller, nz_provider, option};
    use tokio_test::{assert_err, assert_ok};

    #[tokio::test]
    async fn test_worked_scenario() {
        let mut nav = nz_controller();
        nav.open_root(&option("NZ", "New Zealand")).await.unwrap();
        assert_eq!(nav.depth(), 1);
        assert_eq!(nav.top().unwrap().code, "NZ");

        nav.drill(&option("014", "1898 Pictorials")).await.unwrap();
        assert_eq!(nav.depth(), 2);
        assert_eq!(nav.top().unwrap().code, "NZ.014");
        assert_eq!(nav.top().unwrap().kind, StepKind::Series);

        nav.drill(&option("1898", "1898")).await.unwrap();
        assert_eq!(nav.depth(), 3);
        assert_eq!(nav.top().unwrap().code, "NZ.014.1898");

        nav.close().unwrap();
        assert_eq!(nav.depth(), 2);
        assert_eq!(nav.top().unwrap().code, "NZ.014");

        nav.drill_side_category(SideCategory::Errors).await.unwrap();
        assert_eq!(nav.depth(), 3);
        let top = nav.top().unwrap();
        assert_eq!(top.code, "NZ.014.~errors");
        assert_eq!(
            top.consumed_side_categories,
            BTreeSet::from([SideCategory::Errors])
        );

        let err = nav
            .drill_side_category(SideCategory::Errors)
            .await
            .unwrap_err();
        assert_eq!(err, NavError::DuplicateCategory(SideCategory::Errors));
        assert_eq!(nav.depth(), 3);
    }

    #[tokio::test]
    async fn test_open_root_lists_series() {
        let mut nav = nz_controller();
        let root = nav.open_root(&option("NZ", "New Zealand")).await.unwrap();
        assert_eq!(root.kind, StepKind::Country);
        assert_eq!(root.title, "New Zealand");
        assert!(root.options.iter().any(|o| o.id == "014"));
        assert_eq!(nav.request_status(), &RequestStatus::Ready);
    }

    #[tokio::test]
    async fn test_prefix_invariant_along_full_path() {
        let mut nav = nz_controller();
        nav.restore("NZ.014.1898.GBP.1d.Carmine.Wove.NoWmk.14.Stamp")
            .await
            .unwrap();
        let stack = nav.current_stack();
        assert_eq!(stack.len(), 10);
        for pair in stack.windows(2) {
            let expected_prefix = format!("{}{}", pair[0].code, code::SEPARATOR);
            assert!(pair[1].code.starts_with(&expected_prefix));
        }
    }

    #[tokio::test]
    async fn test_drill_from_color_to_currency_is_invalid() {
        let mut nav = nz_controller();
        nav.restore("NZ.014.1898.GBP.1d.Carmine").await.unwrap();
        assert_eq!(nav.top().unwrap().kind, StepKind::Color);

        let before = nav.current_stack().to_vec();
        let err = nav
            .drill_to(StepKind::Currency, &option("NZD", "Dollar"))
            .await
            .unwrap_err();
        assert_eq!(
            err,
            NavError::InvalidTransition {
                from: Some(StepKind::Color),
                to: Some(StepKind::Currency)
            }
        );
        assert_eq!(nav.current_stack(), before.as_slice());
    }

    #[tokio::test]
    async fn test_drill_cannot_skip_a_step() {
        let mut nav = nz_controller();
        nav.open_root(&option("NZ", "New Zealand")).await.unwrap();
        assert_err!(nav.begin_drill_to(StepKind::Year, &option("1898", "1898")));
        assert_err!(nav.begin_drill_to(
            StepKind::SideCategory(SideCategory::Proofs),
            &option("proofs", "Proofs")
        ));
    }

    #[tokio::test]
    async fn test_drill_with_nothing_open_is_invalid() {
        let mut nav = nz_controller();
        let err = nav.drill(&option("014", "1898 Pictorials")).await.unwrap_err();
        assert!(matches!(err, NavError::InvalidTransition { from: None, .. }));
        assert_err!(nav.begin_side_category(SideCategory::Errors));
    }

    #[tokio::test]
    async fn test_provider_failure_leaves_stack_untouched() {
        let mut nav = nz_controller();
        nav.open_root(&option("NZ", "New Zealand")).await.unwrap();
        let before = nav.stack().clone();

        let mut failing = StackController::new(Arc::new(FailingProvider));
        failing.stack.adopt(before.clone());
        let generation = failing.stack().generation();

        let err = failing.drill(&option("014", "1898 Pictorials")).await.unwrap_err();
        match err {
            NavError::ProviderFetch {
                step,
                parent_code,
                source,
            } => {
                assert_eq!(step, StepKind::Series);
                assert_eq!(parent_code, "NZ.014");
                assert!(matches!(source, ProviderError::Network(_)));
            }
            other => panic!("expected ProviderFetch, got {other:?}"),
        }
        assert_eq!(failing.stack(), &before);
        assert_eq!(failing.stack().generation(), generation);
        assert!(matches!(failing.request_status(), RequestStatus::Error(_)));
    }

    #[tokio::test]
    async fn test_open_root_failure_keeps_previous_path() {
        let mut nav = StackController::new(Arc::new(FailingProvider));
        assert_err!(nav.open_root(&option("NZ", "New Zealand")).await);
        assert_eq!(nav.depth(), 0);
    }

    #[tokio::test]
    async fn test_side_category_reentry_blocked_from_descendant() {
        let mut nav = nz_controller();
        nav.restore("NZ.014").await.unwrap();
        nav.drill_side_category(SideCategory::Errors).await.unwrap();
        nav.select_detail(&option("E1", "Inverted centre")).await.unwrap();
        assert_eq!(nav.top().unwrap().kind, StepKind::StampDetail);
        assert!(nav.top().unwrap().has_consumed(SideCategory::Errors));

        assert!(!nav.available_side_categories().contains(&SideCategory::Errors));
        assert_eq!(
            nav.begin_side_category(SideCategory::Errors).unwrap_err(),
            NavError::DuplicateCategory(SideCategory::Errors)
        );
        // A different side-category is still open to us.
        nav.drill_side_category(SideCategory::Postmarks).await.unwrap();
        assert_eq!(
            nav.top().unwrap().consumed_side_categories,
            BTreeSet::from([SideCategory::Errors, SideCategory::Postmarks])
        );
    }

    #[tokio::test]
    async fn test_closing_side_category_frees_it_again() {
        let mut nav = nz_controller();
        nav.restore("NZ.014").await.unwrap();
        nav.drill_side_category(SideCategory::Errors).await.unwrap();
        nav.close().unwrap();
        assert!(nav.available_side_categories().contains(&SideCategory::Errors));
        assert_ok!(nav.drill_side_category(SideCategory::Errors).await);
    }

    #[tokio::test]
    async fn test_stamp_detail_is_terminal() {
        let mut nav = nz_controller();
        nav.restore("NZ.014.1898.GBP.1d.Carmine.Wove.NoWmk.14.Stamp")
            .await
            .unwrap();
        assert!(nav.can_select_detail());
        let detail = nav.select_detail(&option("A1", "Pembroke Peak")).await.unwrap();
        assert_eq!(detail.code, "NZ.014.1898.GBP.1d.Carmine.Wove.NoWmk.14.Stamp.A1");
        assert_eq!(detail.detail.as_ref().unwrap().title, "Pembroke Peak");
        assert!(detail.options.is_empty());

        assert!(!nav.can_drill());
        let err = nav.drill(&option("X", "X")).await.unwrap_err();
        assert_eq!(
            err,
            NavError::InvalidTransition {
                from: Some(StepKind::StampDetail),
                to: None
            }
        );
        assert_ok!(nav.drill_side_category(SideCategory::OnPiece).await);
    }

    #[tokio::test]
    async fn test_select_detail_only_from_item_type_or_side_category() {
        let mut nav = nz_controller();
        nav.restore("NZ.014.1898").await.unwrap();
        assert!(!nav.can_select_detail());
        assert_err!(nav.begin_select_detail(&option("A1", "Pembroke Peak")));
    }

    #[tokio::test]
    async fn test_drill_from_item_type_opens_detail() {
        let mut nav = nz_controller();
        nav.restore("NZ.014.1898.GBP.1d.Carmine.Wove.NoWmk.14.Stamp")
            .await
            .unwrap();
        let entry = nav.drill(&option("A1", "Pembroke Peak")).await.unwrap();
        assert_eq!(entry.kind, StepKind::StampDetail);
        assert!(entry.detail.is_some());
    }

    #[tokio::test]
    async fn test_close_on_empty_stack() {
        let mut nav = nz_controller();
        assert!(!nav.can_close());
        assert_eq!(nav.close().unwrap_err(), NavError::EmptyStack);
    }

    #[tokio::test]
    async fn test_close_all_then_open_new_root() {
        let mut nav = nz_controller();
        nav.restore("NZ.014.1898").await.unwrap();
        nav.close_all();
        assert_eq!(nav.depth(), 0);
        assert!(nav.available_side_categories().is_empty());
        nav.open_root(&option("AU", "Australia")).await.unwrap();
        assert_eq!(nav.breadcrumb(), vec!["Australia"]);
    }

    #[tokio::test]
    async fn test_open_root_replaces_existing_path() {
        let mut nav = nz_controller();
        nav.restore("NZ.014.1898").await.unwrap();
        nav.open_root(&option("AU", "Australia")).await.unwrap();
        assert_eq!(nav.depth(), 1);
        assert_eq!(nav.top().unwrap().code, "AU");
    }

    #[tokio::test]
    async fn test_stale_result_after_close_is_discarded() {
        let mut nav = nz_controller();
        nav.restore("NZ.014").await.unwrap();
        let provider = nz_provider();

        let ticket = nav.begin_drill(&option("1898", "1898")).unwrap();
        nav.close().unwrap();
        let loaded = ticket.load(&provider).await;
        assert_eq!(nav.commit(ticket, loaded).unwrap_err(), NavError::Superseded);
        assert_eq!(nav.depth(), 1);
        assert_eq!(nav.top().unwrap().code, "NZ");
    }

    #[tokio::test]
    async fn test_overlapping_drills_latest_wins() {
        let mut nav = nz_controller();
        nav.restore("NZ.014").await.unwrap();
        let provider = nz_provider();

        let first = nav.begin_drill(&option("1898", "1898")).unwrap();
        let second = nav.begin_drill(&option("1899", "1899")).unwrap();
        assert!(!nav.is_current(&first));
        assert!(nav.is_current(&second));

        let first_loaded = first.load(&provider).await;
        let second_loaded = second.load(&provider).await;

        assert_eq!(
            nav.commit(first, first_loaded).unwrap_err(),
            NavError::Superseded
        );
        let top = nav.commit(second, second_loaded).unwrap();
        assert_eq!(top.code, "NZ.014.1899");
        assert_eq!(nav.depth(), 3);
    }

    #[tokio::test]
    async fn test_stale_failure_does_not_touch_status() {
        let mut nav = nz_controller();
        nav.restore("NZ.014").await.unwrap();
        let first = nav.begin_drill(&option("1898", "1898")).unwrap();
        let _second = nav.begin_drill(&option("1899", "1899")).unwrap();
        let failed = first.load(&FailingProvider).await;
        assert_eq!(nav.commit(first, failed).unwrap_err(), NavError::Superseded);
        assert_eq!(nav.request_status(), &RequestStatus::Loading(StepKind::Year));
    }

    #[tokio::test]
    async fn test_restore_unknown_segment_keeps_stack() {
        let mut nav = nz_controller();
        nav.restore("NZ.014").await.unwrap();
        let before = nav.current_stack().to_vec();
        let err = nav.restore("NZ.014.1777").await.unwrap_err();
        assert_eq!(
            err,
            NavError::PathNotFound {
                code: "NZ.014.1777".to_string(),
                segment: "1777".to_string()
            }
        );
        assert_eq!(nav.current_stack(), before.as_slice());
        assert_err!(nav.restore("").await);
        assert_err!(nav.restore("XX").await);
    }

    #[tokio::test]
    async fn test_restore_invalidates_in_flight_tickets() {
        let mut nav = nz_controller();
        nav.restore("NZ.014").await.unwrap();
        let ticket = nav.begin_drill(&option("1898", "1898")).unwrap();
        nav.restore("NZ.014").await.unwrap();
        assert!(!nav.is_current(&ticket));
    }

    #[tokio::test]
    async fn test_restore_side_category_path() {
        let mut nav = nz_controller();
        let top = nav.restore("NZ.014.~errors.E1").await.unwrap();
        assert_eq!(top.kind, StepKind::StampDetail);
        assert!(top.has_consumed(SideCategory::Errors));
        assert_eq!(
            nav.breadcrumb(),
            vec!["New Zealand", "1898 Pictorials", "Errors", "Inverted centre"]
        );
    }

    #[tokio::test]
    async fn test_linear_segment_named_like_side_category_keeps_its_own_code() {
        use crate::catalogue::FixtureCatalogueProvider;

        let provider = FixtureCatalogueProvider::new()
            .with_options(StepKind::Country, "", vec![option("NZ", "New Zealand")])
            .with_options(StepKind::Series, "NZ", vec![option("errors", "Errors Series")])
            .with_options(StepKind::Year, "NZ.errors", vec![option("1990", "1990")])
            .with_options(StepKind::StampDetail, "NZ.~errors", vec![option("E1", "Inverted")]);
        let mut nav = StackController::new(Arc::new(provider));
        nav.open_root(&option("NZ", "New Zealand")).await.unwrap();

        let side = nav.drill_side_category(SideCategory::Errors).await.unwrap().code.clone();
        nav.close().unwrap();
        let linear = nav.drill(&option("errors", "Errors Series")).await.unwrap().code.clone();
        assert_ne!(side, linear);

        let top = nav.restore(&side).await.unwrap();
        assert_eq!(top.kind, StepKind::SideCategory(SideCategory::Errors));
        let top = nav.restore(&linear).await.unwrap();
        assert_eq!(top.kind, StepKind::Series);
        assert_eq!(top.options[0].label, "1990");
    }

    #[tokio::test]
    async fn test_next_step_kind_affordance() {
        let mut nav = nz_controller();
        assert_eq!(nav.next_step_kind(), None);
        nav.open_root(&option("NZ", "New Zealand")).await.unwrap();
        assert_eq!(nav.next_step_kind(), Some(StepKind::Series));
        assert_eq!(nav.available_side_categories().len(), SideCategory::ALL.len());
    }

    #[tokio::test]
    async fn test_adopt_scratch_stack() {
        let mut nav = nz_controller();
        nav.open_root(&option("NZ", "New Zealand")).await.unwrap();
        let ticket = nav.begin_drill(&option("014", "1898 Pictorials")).unwrap();

        let mut scratch = StackController::new(nav.provider());
        scratch.restore("NZ.015").await.unwrap();
        nav.adopt(scratch.into_stack());

        assert_eq!(nav.top().unwrap().code, "NZ.015");
        assert_eq!(nav.request_status(), &RequestStatus::Ready);
        assert!(!nav.is_current(&ticket));
    }

    #[tokio::test]
    async fn test_restore_begun_before_newer_drill_is_discarded() {
        let mut nav = nz_controller();
        nav.open_root(&option("NZ", "New Zealand")).await.unwrap();

        let restore = nav.begin_restore("NZ.015");
        let replayed = restore.replay(nav.provider()).await;
        nav.drill(&option("014", "1898 Pictorials")).await.unwrap();

        let err = nav.commit_restore(restore, replayed).unwrap_err();
        assert_eq!(err, NavError::Superseded);
        assert_eq!(nav.top().unwrap().code, "NZ.014");
        assert_eq!(nav.request_status(), &RequestStatus::Ready);
    }

    #[tokio::test]
    async fn test_restore_supersedes_earlier_drill() {
        let mut nav = nz_controller();
        nav.open_root(&option("NZ", "New Zealand")).await.unwrap();
        let drill = nav.begin_drill(&option("014", "1898 Pictorials")).unwrap();

        let restore = nav.begin_restore("NZ.015");
        assert!(!nav.is_current(&drill));
        let replayed = restore.replay(nav.provider()).await;
        assert_eq!(nav.commit_restore(restore, replayed).unwrap().code, "NZ.015");
    }

    #[tokio::test]
    async fn test_close_on_empty_stack_cancels_pending_root() {
        let mut nav = nz_controller();
        let ticket = nav.begin_open_root(&option("NZ", "New Zealand"));
        assert_err!(nav.close());
        assert!(!nav.is_current(&ticket));
        assert_eq!(nav.request_status(), &RequestStatus::Idle);

        let loaded = ticket.load(nav.provider().as_ref()).await;
        assert_eq!(nav.commit(ticket, loaded).unwrap_err(), NavError::Superseded);
        assert_eq!(nav.depth(), 0);
    }
}
