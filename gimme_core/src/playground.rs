use crate::notice::{Notice, Operation, ValidationError};
use crate::settings::Settings;
use crate::snippet::Lookup;
use crate::store::{self, SnippetStore};
use std::fmt::Display;

/// What's in the editor before anyone types anything.
pub const PLACEHOLDER: &str = "// Write your code here...
// Reference codes can be overwritten, choose wisely

function greet() {
  console.log(\"Reference code in -> Share. Same code -> Load.\");
}

greet();
";

/// The playground's state, and the rules for sharing and loading it.
///
/// This doesn't do any I/O itself. `share` and `load` check the inputs and
/// hand back a `Request` for the caller to send to a store whenever it likes;
/// the result comes back in through `finish`. Between the two, the
/// playground is busy.
#[derive(Debug, Clone)]
pub struct Playground {
    /// The code in the editor
    pub code: String,

    /// The key the user wants to share under or load from
    pub reference_code: String,

    /// Cosmetic preferences
    pub settings: Settings,

    /// Is a request outstanding? Frontends use this to disable share and
    /// load; nothing here enforces it.
    busy: bool,
}

impl Playground {
    /// A fresh playground with the placeholder code and no reference code.
    pub fn new() -> Self {
        Self {
            code: PLACEHOLDER.to_owned(),
            reference_code: String::new(),
            settings: Settings::default(),
            busy: false,
        }
    }

    /// Is there a request outstanding?
    pub fn is_busy(&self) -> bool {
        self.busy
    }

    /// Would sharing go anywhere right now? Frontends use this to decide
    /// whether the share control looks enabled.
    pub fn can_share(&self) -> bool {
        !self.busy && !is_blank(&self.code) && !is_blank(&self.reference_code)
    }

    /// Would loading go anywhere right now?
    pub fn can_load(&self) -> bool {
        !self.busy && !is_blank(&self.reference_code)
    }

    /// Start sharing the current code under the current reference code.
    ///
    /// ## Errors
    ///
    /// `ValidationError::MissingCodeOrReference` if either is blank. Nothing
    /// changes in that case.
    pub fn share(&mut self) -> Result<Request, ValidationError> {
        if is_blank(&self.code) || is_blank(&self.reference_code) {
            return Err(ValidationError::MissingCodeOrReference);
        }

        self.busy = true;

        Ok(Request::Write {
            key: self.reference_code.clone(),
            code: self.code.clone(),
        })
    }

    /// Start loading whatever is under the current reference code.
    ///
    /// ## Errors
    ///
    /// `ValidationError::MissingReference` if the reference code is blank.
    /// Nothing changes in that case.
    pub fn load(&mut self) -> Result<Request, ValidationError> {
        if is_blank(&self.reference_code) {
            return Err(ValidationError::MissingReference);
        }

        self.busy = true;

        Ok(Request::Read {
            key: self.reference_code.clone(),
        })
    }

    /// Get the code to put on the clipboard.
    ///
    /// ## Errors
    ///
    /// `ValidationError::NothingToCopy` if the code is blank.
    pub fn copy(&self) -> Result<&str, ValidationError> {
        if is_blank(&self.code) {
            Err(ValidationError::NothingToCopy)
        } else {
            Ok(&self.code)
        }
    }

    /// Apply the result of a request and say how it went.
    pub fn finish(&mut self, completion: Completion) -> Notice {
        match completion {
            Completion::Wrote(result) => self.finish_share(result),
            Completion::Read(result) => self.finish_load(result),
        }
    }

    /// Finish sharing.
    pub fn finish_share<E: Display>(&mut self, result: Result<(), E>) -> Notice {
        self.busy = false;

        match result {
            Ok(()) => Notice::Shared,
            Err(err) => Notice::Failed(Operation::Share, err.to_string()),
        }
    }

    /// Finish loading. The code only changes if we actually found something.
    pub fn finish_load<E: Display>(&mut self, result: Result<Lookup, E>) -> Notice {
        self.busy = false;

        match result {
            Ok(Lookup::Found(snippet)) => {
                self.code = snippet.code;
                Notice::Loaded
            }
            Ok(Lookup::NotFound) => Notice::NotFound,
            Err(err) => Notice::Failed(Operation::Load, err.to_string()),
        }
    }
}

impl Default for Playground {
    fn default() -> Self {
        Self::new()
    }
}

/// Whitespace doesn't count as input.
fn is_blank(field: &str) -> bool {
    field.trim().is_empty()
}

/// Something for a store to do on the playground's behalf. Keys and code are
/// passed along exactly as typed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    /// Write this code under this key
    Write {
        /// The reference code
        key: String,

        /// The code to share
        code: String,
    },

    /// Read whatever is under this key
    Read {
        /// The reference code
        key: String,
    },
}

impl Request {
    /// Which user-facing operation this is part of
    pub fn operation(&self) -> Operation {
        match self {
            Self::Write { .. } => Operation::Share,
            Self::Read { .. } => Operation::Load,
        }
    }

    /// The reference code this request is for
    pub fn key(&self) -> &str {
        match self {
            Self::Write { key, .. } | Self::Read { key } => key,
        }
    }

    /// Send this request to a store. Exactly one call is made, and failures
    /// come back in the `Completion` rather than as an `Err`.
    pub async fn send<S: SnippetStore>(self, store: &S) -> Completion {
        match self {
            Self::Write { key, code } => Completion::Wrote(store.write(&key, &code).await),
            Self::Read { key } => Completion::Read(store.read(&key).await),
        }
    }
}

/// The result of sending a `Request`.
#[derive(Debug)]
pub enum Completion {
    /// The result of a `Request::Write`
    Wrote(store::Result<()>),

    /// The result of a `Request::Read`
    Read(store::Result<Lookup>),
}

impl Completion {
    /// Which user-facing operation this completes
    pub fn operation(&self) -> Operation {
        match self {
            Self::Wrote(_) => Operation::Share,
            Self::Read(_) => Operation::Load,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::store::MemoryStore;

    /// Send a request and feed the result back, like a frontend would.
    async fn run(playground: &mut Playground, store: &MemoryStore, request: Request) -> Notice {
        let completion = request.send(store).await;
        playground.finish(completion)
    }

    /// Property tests need to await the store, but their bodies are sync.
    fn runtime() -> tokio::runtime::Runtime {
        tokio::runtime::Builder::new_current_thread()
            .build()
            .expect("could not build runtime")
    }

    fn playground(code: &str, reference_code: &str) -> Playground {
        let mut playground = Playground::new();
        playground.code = code.to_owned();
        playground.reference_code = reference_code.to_owned();
        playground
    }

    #[test]
    fn starts_with_placeholder() {
        let playground = Playground::new();

        assert_eq!(playground.code, PLACEHOLDER);
        assert_eq!(playground.reference_code, "");
        assert!(!playground.is_busy());
    }

    #[test]
    fn controls_disable_while_busy() {
        let mut playground = playground("greet();", "abc123");
        assert!(playground.can_share());
        assert!(playground.can_load());

        let _ = playground.share().unwrap();

        assert!(!playground.can_share());
        assert!(!playground.can_load());

        playground.finish_share::<String>(Ok(()));

        assert!(playground.can_share());
    }

    #[test]
    fn controls_follow_blank_fields() {
        assert!(!playground("", "abc123").can_share());
        assert!(playground("", "abc123").can_load());
        assert!(!playground("greet();", " ").can_load());
    }

    mod share {
        use super::*;

        #[tokio::test]
        async fn shares_under_reference_code() {
            let store = MemoryStore::new();
            let mut playground = playground("greet();", "abc123");

            let request = playground.share().unwrap();
            assert!(playground.is_busy());
            assert_eq!(request.operation(), Operation::Share);

            let notice = run(&mut playground, &store, request).await;

            assert_eq!(notice, Notice::Shared);
            assert!(!playground.is_busy());
            assert_eq!(store.get("abc123").map(|s| s.code), Some("greet();".to_owned()));
        }

        #[test]
        fn empty_code_is_rejected() {
            let mut playground = playground("", "abc123");

            assert_eq!(
                playground.share(),
                Err(ValidationError::MissingCodeOrReference)
            );
            assert!(!playground.is_busy());
        }

        #[test]
        fn empty_reference_is_rejected() {
            let mut playground = playground("greet();", "");

            assert_eq!(
                playground.share(),
                Err(ValidationError::MissingCodeOrReference)
            );
        }

        #[test]
        fn whitespace_only_counts_as_empty() {
            assert!(playground("  \n\t", "abc123").share().is_err());
            assert!(playground("greet();", "   ").share().is_err());
        }

        #[test]
        fn sends_fields_verbatim() {
            let mut playground = playground("  greet();\n", " abc ");

            assert_eq!(
                playground.share(),
                Ok(Request::Write {
                    key: " abc ".to_owned(),
                    code: "  greet();\n".to_owned(),
                })
            );
        }

        #[tokio::test]
        async fn failure_reports_reason_and_clears_busy() {
            let store = MemoryStore::new();
            store.set_outage(Some("quota exceeded".to_owned()));
            let mut playground = playground("greet();", "abc123");

            let request = playground.share().unwrap();
            let notice = run(&mut playground, &store, request).await;

            assert_eq!(
                notice,
                Notice::Failed(
                    Operation::Share,
                    "store unavailable: quota exceeded".to_owned()
                )
            );
            assert!(!playground.is_busy());
            assert_eq!(playground.code, "greet();");
        }

        #[tokio::test]
        async fn resharing_overwrites() {
            let store = MemoryStore::new();
            let mut playground = playground("first();", "abc123");

            let request = playground.share().unwrap();
            run(&mut playground, &store, request).await;

            playground.code = "second();".to_owned();
            let request = playground.share().unwrap();
            run(&mut playground, &store, request).await;

            playground.code = String::new();
            let request = playground.load().unwrap();
            run(&mut playground, &store, request).await;

            assert_eq!(playground.code, "second();");
            assert_eq!(store.len(), 1);
        }
    }

    mod load {
        use super::*;

        #[tokio::test]
        async fn replaces_code() {
            let store = MemoryStore::new();
            let mut sharer = playground("greet();", "abc123");
            let request = sharer.share().unwrap();
            run(&mut sharer, &store, request).await;

            let mut loader = playground("something else", "abc123");
            let request = loader.load().unwrap();
            assert!(loader.is_busy());

            let notice = run(&mut loader, &store, request).await;

            assert_eq!(notice, Notice::Loaded);
            assert_eq!(loader.code, "greet();");
            assert!(!loader.is_busy());
        }

        #[tokio::test]
        async fn not_found_leaves_code_alone() {
            let store = MemoryStore::new();
            let mut playground = playground("mine", "doesnotexist");

            let request = playground.load().unwrap();
            let notice = run(&mut playground, &store, request).await;

            assert_eq!(notice, Notice::NotFound);
            assert_eq!(playground.code, "mine");
            assert!(!playground.is_busy());
        }

        #[tokio::test]
        async fn failure_leaves_code_alone() {
            let store = MemoryStore::new();
            store.write("abc123", "theirs").await.unwrap();
            store.set_outage(Some("offline".to_owned()));
            let mut playground = playground("mine", "abc123");

            let request = playground.load().unwrap();
            let notice = run(&mut playground, &store, request).await;

            assert!(matches!(notice, Notice::Failed(Operation::Load, _)));
            assert_eq!(playground.code, "mine");
            assert!(!playground.is_busy());
        }

        #[test]
        fn empty_reference_is_rejected() {
            let mut playground = playground("mine", " ");

            assert_eq!(playground.load(), Err(ValidationError::MissingReference));
            assert!(!playground.is_busy());
        }

        #[test]
        fn empty_code_is_fine() {
            let mut playground = playground("", "abc123");

            assert_eq!(
                playground.load(),
                Ok(Request::Read {
                    key: "abc123".to_owned()
                })
            );
        }

        #[test]
        fn last_completion_wins() {
            let mut playground = playground("mine", "abc123");

            let _ = playground.load().unwrap();
            let _ = playground.load().unwrap();

            playground.finish_load::<String>(Ok(Lookup::Found(crate::Snippet::new(
                "slow".to_owned(),
            ))));
            playground.finish_load::<String>(Ok(Lookup::Found(crate::Snippet::new(
                "fast".to_owned(),
            ))));

            assert_eq!(playground.code, "fast");
        }
    }

    mod copy {
        use super::*;

        #[test]
        fn gives_code() {
            assert_eq!(playground("greet();", "").copy(), Ok("greet();"));
        }

        #[test]
        fn nothing_to_copy() {
            assert_eq!(
                playground(" \n", "").copy(),
                Err(ValidationError::NothingToCopy)
            );
        }
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn share_then_load_round_trips(
                code in "\\PC*[^\\s]\\PC*",
                key in "[a-zA-Z0-9_-]{1,24}",
            ) {
                let store = MemoryStore::new();
                let runtime = runtime();

                let mut sharer = playground(&code, &key);
                let request = sharer.share().unwrap();
                prop_assert_eq!(runtime.block_on(run(&mut sharer, &store, request)), Notice::Shared);

                let mut loader = playground("", &key);
                let request = loader.load().unwrap();
                prop_assert_eq!(runtime.block_on(run(&mut loader, &store, request)), Notice::Loaded);

                prop_assert_eq!(loader.code, code);
            }

            #[test]
            fn blank_fields_never_make_requests(
                blank in "\\s*",
                other in "\\PC*",
            ) {
                prop_assert!(playground(&blank, &other).share().is_err());
                prop_assert!(playground(&other, &blank).share().is_err());
                prop_assert!(playground(&other, &blank).load().is_err());
            }
        }
    }

    mod model {
        use super::*;
        use proptest::prelude::*;
        use proptest_state_machine::{prop_state_machine, ReferenceStateMachine, StateMachineTest};
        use std::collections::HashMap;

        /// What the user can do
        #[derive(Debug, Clone)]
        enum Transition {
            Type(String),
            Reference(String),
            Share,
            Load,
        }

        /// What we expect the world to look like
        #[derive(Debug, Clone)]
        struct Model {
            code: String,
            reference_code: String,
            snippets: HashMap<String, String>,
        }

        struct Reference;

        impl ReferenceStateMachine for Reference {
            type State = Model;
            type Transition = Transition;

            fn init_state() -> BoxedStrategy<Self::State> {
                Just(Model {
                    code: PLACEHOLDER.to_owned(),
                    reference_code: String::new(),
                    snippets: HashMap::new(),
                })
                .boxed()
            }

            fn transitions(_state: &Self::State) -> BoxedStrategy<Self::Transition> {
                let codes = prop::sample::select(vec!["", " \n", "greet();", "a\nb", "x"]);
                let keys = prop::sample::select(vec!["", "  ", "abc123", "xyz", "a b"]);

                prop_oneof![
                    codes.prop_map(|code| Transition::Type(code.to_owned())),
                    keys.prop_map(|key| Transition::Reference(key.to_owned())),
                    Just(Transition::Share),
                    Just(Transition::Load),
                ]
                .boxed()
            }

            fn apply(mut state: Self::State, transition: &Self::Transition) -> Self::State {
                match transition {
                    Transition::Type(code) => state.code.clone_from(code),
                    Transition::Reference(key) => state.reference_code.clone_from(key),
                    Transition::Share => {
                        if !is_blank(&state.code) && !is_blank(&state.reference_code) {
                            state
                                .snippets
                                .insert(state.reference_code.clone(), state.code.clone());
                        }
                    }
                    Transition::Load => {
                        if let Some(code) = state.snippets.get(&state.reference_code) {
                            state.code.clone_from(code);
                        }
                    }
                }

                state
            }
        }

        /// The real playground and store, plus a way to wait on the store
        struct Harness {
            runtime: tokio::runtime::Runtime,
            store: MemoryStore,
            playground: Playground,
        }

        impl StateMachineTest for Harness {
            type SystemUnderTest = Self;
            type Reference = Reference;

            fn init_test(
                _ref_state: &<Self::Reference as ReferenceStateMachine>::State,
            ) -> Self::SystemUnderTest {
                Harness {
                    runtime: runtime(),
                    store: MemoryStore::new(),
                    playground: Playground::new(),
                }
            }

            fn apply(
                mut state: Self::SystemUnderTest,
                _ref_state: &<Self::Reference as ReferenceStateMachine>::State,
                transition: <Self::Reference as ReferenceStateMachine>::Transition,
            ) -> Self::SystemUnderTest {
                let calls_before = state.store.calls();

                let started = match transition {
                    Transition::Type(code) => {
                        state.playground.code = code;
                        return state;
                    }
                    Transition::Reference(key) => {
                        state.playground.reference_code = key;
                        return state;
                    }
                    Transition::Share => state.playground.share(),
                    Transition::Load => state.playground.load(),
                };

                match started {
                    Ok(request) => {
                        let completion = state.runtime.block_on(request.send(&state.store));
                        let notice = state.playground.finish(completion);
                        assert_ne!(notice.level(), crate::notice::Level::Pending);
                        assert_eq!(state.store.calls(), calls_before + 1);
                    }
                    Err(_) => assert_eq!(state.store.calls(), calls_before),
                }

                state
            }

            fn check_invariants(
                state: &Self::SystemUnderTest,
                ref_state: &<Self::Reference as ReferenceStateMachine>::State,
            ) {
                assert!(!state.playground.is_busy());
                assert_eq!(state.playground.code, ref_state.code);
                assert_eq!(state.store.len(), ref_state.snippets.len());

                for (key, code) in &ref_state.snippets {
                    assert_eq!(state.store.get(key).map(|s| s.code).as_ref(), Some(code));
                }
            }
        }

        prop_state_machine! {
            #[test]
            fn playground_matches_model(sequential 1..40 => Harness);
        }
    }
}
