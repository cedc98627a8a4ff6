//! Registration surface
//!
//! The fixed directory of tests and actions this extension contributes to a
//! host, together with the flags the host parser must recognise to reach
//! them. Everything here is built once at startup and only read afterwards.
//!
//! # Examples
//!
//! ```
//! use std::sync::Arc;
//! use mfind_exif::{Args, Context, MetadataSource, Registry};
//!
//! let registry = Registry::new(Arc::new(MetadataSource::default()));
//! let mut ctx = Context::new("missing.jpg").with_args(Args::one("Canon"));
//!
//! let make = registry.test("make").expect("make is registered");
//! assert!(make.test(&mut ctx).is_none());
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use clap::{Arg, ArgAction, Command};

use crate::actions::{Action, PrintBufferHash, PrintTag, PrintTags};
use crate::context::{Args, Context};
use crate::matcher::CaseMode;
use crate::metadata::MetadataSource;
use crate::predicates::{HasTagPredicate, KeyMode, TagValuePredicate, Test, make_tag_predicate};

/// Number of arguments a flag consumes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    Zero,
    One,
    Two,
    /// Zero or one argument
    OptionalOne,
}

/// Whether a flag invokes a test or an action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlagKind {
    Test,
    Action,
}

/// One flag contributed to the host's command line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlagSpec {
    /// Long flag as typed by the user, without dashes
    pub flag: &'static str,
    /// Registry name of the test or action the flag invokes
    pub name: &'static str,
    pub kind: FlagKind,
    pub arity: Arity,
    pub value_names: &'static [&'static str],
    pub help: &'static str,
}

impl FlagSpec {
    /// Build the `clap` argument for this flag
    #[must_use]
    pub fn to_arg(&self) -> Arg {
        let heading = match self.kind {
            FlagKind::Test => "Tests",
            FlagKind::Action => "Actions",
        };
        let arg = Arg::new(self.name)
            .long(self.flag)
            .help(self.help)
            .help_heading(heading)
            .value_names(self.value_names.iter().copied());

        match self.arity {
            Arity::Zero => arg.action(ArgAction::SetTrue),
            Arity::One => arg.num_args(1).action(ArgAction::Append),
            Arity::Two => arg.num_args(2).action(ArgAction::Append),
            Arity::OptionalOne => arg
                .num_args(0..=1)
                .default_missing_value("")
                .action(ArgAction::Append),
        }
    }

    /// Shape the values of one occurrence into [`Args`]
    ///
    /// An empty value for an optional argument means the argument was left out.
    #[must_use]
    pub fn args_from(&self, values: &[String]) -> Args {
        match (self.arity, values) {
            (Arity::OptionalOne, [value]) if value.is_empty() => Args::None,
            (Arity::One | Arity::OptionalOne, [value]) => Args::one(value.as_str()),
            (Arity::Two, [first, second]) => Args::two(first.as_str(), second.as_str()),
            _ => Args::None,
        }
    }
}

/// Every flag this extension contributes, in help order
pub const FLAGS: &[FlagSpec] = &[
    FlagSpec {
        flag: "tag",
        name: "tag",
        kind: FlagKind::Test,
        arity: Arity::Two,
        value_names: &["TAG", "VALUE"],
        help: "Filter images by a tag and its value, e.g. `--tag Exif.Photo.FNumber f/2.8`",
    },
    FlagSpec {
        flag: "make",
        name: "make",
        kind: FlagKind::Test,
        arity: Arity::One,
        value_names: &["MAKE"],
        help: "Filter images by camera manufacturer (Exif.Image.Make), e.g. `--make Canon`",
    },
    FlagSpec {
        flag: "imake",
        name: "imake",
        kind: FlagKind::Test,
        arity: Arity::One,
        value_names: &["MAKE"],
        help: "Like --make but case insensitive: `--imake canon` matches \"Canon\" and \"CaNoN\"",
    },
    FlagSpec {
        flag: "model",
        name: "model",
        kind: FlagKind::Test,
        arity: Arity::One,
        value_names: &["MODEL"],
        help: "Filter images by camera model (Exif.Image.Model)",
    },
    FlagSpec {
        flag: "imodel",
        name: "imodel",
        kind: FlagKind::Test,
        arity: Arity::One,
        value_names: &["MODEL"],
        help: "Filter images by camera model, case insensitive",
    },
    FlagSpec {
        flag: "software",
        name: "software",
        kind: FlagKind::Test,
        arity: Arity::One,
        value_names: &["SOFTWARE"],
        help: "Filter images by Exif.Image.Software",
    },
    FlagSpec {
        flag: "isoftware",
        name: "isoftware",
        kind: FlagKind::Test,
        arity: Arity::One,
        value_names: &["SOFTWARE"],
        help: "Filter images by Exif.Image.Software, case insensitive",
    },
    FlagSpec {
        flag: "has-tag",
        name: "has_tag",
        kind: FlagKind::Test,
        arity: Arity::One,
        value_names: &["TAG"],
        help: "Filter images that carry the given tag (short names allowed)",
    },
    FlagSpec {
        flag: "ihas-tag",
        name: "ihas_tag",
        kind: FlagKind::Test,
        arity: Arity::One,
        value_names: &["TAG"],
        help: "Like --has-tag but the tag name is compared case insensitively",
    },
    FlagSpec {
        flag: "rhas-tag",
        name: "rhas_tag",
        kind: FlagKind::Test,
        arity: Arity::One,
        value_names: &["REGEX"],
        help: "Filter images that carry a tag whose name matches the regular expression",
    },
    FlagSpec {
        flag: "print-buffer-hash",
        name: "print_buffer_hash",
        kind: FlagKind::Action,
        arity: Arity::Zero,
        value_names: &[],
        help: "Print a SHA-256 hash of the raw metadata buffer",
    },
    FlagSpec {
        flag: "print-tag",
        name: "print_tag",
        kind: FlagKind::Action,
        arity: Arity::One,
        value_names: &["TAG"],
        help: "Print a tag given by name, e.g. `--print-tag Exif.Thumbnail.Orientation` or \
               `--print-tag make`. The name may be a case-sensitive glob such as '*Image*'",
    },
    FlagSpec {
        flag: "print-tags",
        name: "print_tags",
        kind: FlagKind::Action,
        arity: Arity::OptionalOne,
        value_names: &["PATTERN"],
        help: "Print `tag: value` lines for the tags matching an optional glob; \
               without a pattern every tag is printed",
    },
];

const FIXED_TAG_TESTS: &[(&str, &str, CaseMode)] = &[
    ("make", "make", CaseMode::Sensitive),
    ("imake", "make", CaseMode::Insensitive),
    ("model", "model", CaseMode::Sensitive),
    ("imodel", "model", CaseMode::Insensitive),
    ("software", "software", CaseMode::Sensitive),
    ("isoftware", "software", CaseMode::Insensitive),
];

/// Name to test and name to action directory
pub struct Registry {
    tests: BTreeMap<&'static str, Box<dyn Test>>,
    actions: BTreeMap<&'static str, Box<dyn Action>>,
}

impl Registry {
    /// Build every test and action over a shared metadata source
    #[must_use]
    pub fn new(source: Arc<MetadataSource>) -> Self {
        let mut tests: BTreeMap<&'static str, Box<dyn Test>> = BTreeMap::new();
        tests.insert("tag", Box::new(TagValuePredicate::new(Arc::clone(&source))));
        for (name, tag, case) in FIXED_TAG_TESTS {
            tests.insert(*name, Box::new(make_tag_predicate(Arc::clone(&source), *tag, *case)));
        }
        for (name, mode) in [
            ("has_tag", KeyMode::Exact),
            ("ihas_tag", KeyMode::Caseless),
            ("rhas_tag", KeyMode::Regex),
        ] {
            tests.insert(name, Box::new(HasTagPredicate::new(Arc::clone(&source), mode)));
        }

        let mut actions: BTreeMap<&'static str, Box<dyn Action>> = BTreeMap::new();
        actions.insert("print_tag", Box::new(PrintTag::new(Arc::clone(&source))));
        actions.insert("print_tags", Box::new(PrintTags::new(Arc::clone(&source))));
        actions.insert("print_buffer_hash", Box::new(PrintBufferHash::new(source)));

        Self { tests, actions }
    }

    #[must_use]
    pub fn test(&self, name: &str) -> Option<&dyn Test> {
        self.tests.get(name).map(AsRef::as_ref)
    }

    #[must_use]
    pub fn action(&self, name: &str) -> Option<&dyn Action> {
        self.actions.get(name).map(AsRef::as_ref)
    }

    pub fn test_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.tests.keys().copied()
    }

    pub fn action_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.actions.keys().copied()
    }

    #[must_use]
    pub const fn flags() -> &'static [FlagSpec] {
        FLAGS
    }

    /// Flag spec for a registry name
    #[must_use]
    pub fn flag(name: &str) -> Option<&'static FlagSpec> {
        FLAGS.iter().find(|spec| spec.name == name)
    }

    /// Add this extension's flags to a host command
    #[must_use]
    pub fn augment_command(cmd: Command) -> Command {
        FLAGS.iter().fold(cmd, |cmd, spec| cmd.arg(spec.to_arg()))
    }

    /// Invoke the test or action behind `spec` with `args`
    ///
    /// Returns `false` only when a test did not match; actions always succeed.
    pub fn invoke(&self, spec: &FlagSpec, ctx: &mut Context, args: Args) -> bool {
        ctx.set_args(args);
        match spec.kind {
            FlagKind::Test => self
                .test(spec.name)
                .is_some_and(|test| test.test(ctx).is_some()),
            FlagKind::Action => {
                if let Some(action) = self.action(spec.name) {
                    action.run(ctx);
                }
                true
            }
        }
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("tests", &self.tests.keys().collect::<Vec<_>>())
            .field("actions", &self.actions.keys().collect::<Vec<_>>())
            .finish()
    }
}
