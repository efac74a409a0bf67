//! Documentation pages on docs.python.org for resolved names.
//!
//! Only the standard library and the language reference are covered; names
//! from third-party packages map to `None`.

use crate::resolver::IMPLICIT_NAMESPACE;

const DOCS_ROOT: &str = "https://docs.python.org/3";

/// Private modules documented under their public name
const MODULE_RENAMES: &[(&str, &str)] = &[("_collections_abc", "collections.abc")];

/// Submodules that have a page of their own rather than a section in the
/// parent module's page
const SUBMODULE_PAGES: &[&str] = &[
    "collections.abc",
    "os.path",
    "logging.config",
    "logging.handlers",
    "curses.ascii",
    "curses.panel",
    "multiprocessing.shared_memory",
    "concurrent.futures",
    "html.parser",
    "html.entities",
    "xml.etree.elementtree",
    "xml.dom",
    "xml.dom.minidom",
    "xml.dom.pulldom",
    "xml.sax",
    "xml.sax.handler",
    "xml.sax.utils",
    "xml.sax.reader",
    "urllib.request",
    "urllib.parse",
    "urllib.error",
    "urllib.robotparser",
    "http.client",
    "http.server",
    "http.cookies",
    "http.cookiejar",
    "xmlrpc.server",
    "tkinter.colorchooser",
    "tkinter.font",
    "tkinter.messagebox",
    "tkinter.scrolledtext",
    "tkinter.dnd",
    "tkinter.ttk",
    "tkinter.tix",
    "unittest.mock",
];

const ABC_CLASSES: &[&str] = &[
    "AsyncGenerator",
    "AsyncIterable",
    "AsyncIterator",
    "Awaitable",
    "ByteString",
    "Callable",
    "Collection",
    "Container",
    "Coroutine",
    "Generator",
    "Hashable",
    "ItemsView",
    "Iterable",
    "Iterator",
    "KeysView",
    "Mapping",
    "MappingView",
    "MutableMapping",
    "MutableSequence",
    "MutableSet",
    "Reversible",
    "Sequence",
    "Set",
    "Sized",
    "ValuesView",
];

/// Builtin types documented in `stdtypes.html`
const STD_TYPES: &[&str] = &[
    "int",
    "float",
    "complex",
    "list",
    "tuple",
    "range",
    "str",
    "bytes",
    "bytearray",
    "memoryview",
    "set",
    "frozenset",
    "dict",
];

const CONSTANTS: &[&str] = &[
    "False",
    "True",
    "None",
    "NotImplemented",
    "Ellipsis",
    "__debug__",
    "quit",
    "copyright",
    "credits",
    "license",
];

const EXCEPTION_SUFFIXES: &[&str] = &["Exception", "Error", "Exit", "Warning", "Interrupt"];

/// Top-level standard library modules with a page under `library/`
const STDLIB_MODULES: &[&str] = &[
    "__future__", "abc", "aifc", "argparse", "array", "ast", "asynchat", "asyncio",
    "asyncore", "atexit", "audioop", "base64", "bdb", "binascii", "bisect", "builtins",
    "bz2", "calendar", "cgi", "cgitb", "chunk", "cmath", "cmd", "code", "codecs",
    "codeop", "collections", "colorsys", "compileall", "concurrent", "configparser",
    "contextlib", "contextvars", "copy", "copyreg", "cProfile", "crypt", "csv", "ctypes",
    "curses", "dataclasses", "datetime", "dbm", "decimal", "difflib", "dis", "doctest",
    "email", "encodings", "ensurepip", "enum", "errno", "faulthandler", "fcntl",
    "filecmp", "fileinput", "fnmatch", "fractions", "ftplib", "functools", "gc",
    "getopt", "getpass", "gettext", "glob", "graphlib", "grp", "gzip", "hashlib",
    "heapq", "hmac", "html", "http", "imaplib", "imghdr", "importlib", "inspect", "io",
    "ipaddress", "itertools", "json", "keyword", "linecache", "locale", "logging",
    "lzma", "mailbox", "mailcap", "marshal", "math", "mimetypes", "mmap",
    "modulefinder", "msvcrt", "multiprocessing", "netrc", "nntplib", "numbers",
    "operator", "optparse", "os", "pathlib", "pdb", "pickle", "pickletools", "pipes",
    "pkgutil", "platform", "plistlib", "poplib", "posix", "pprint", "profile",
    "pstats", "pty", "pwd", "py_compile", "pyclbr", "pydoc", "queue", "quopri",
    "random", "re", "readline", "reprlib", "resource", "rlcompleter", "runpy", "sched",
    "secrets", "select", "selectors", "shelve", "shlex", "shutil", "signal", "site",
    "smtplib", "sndhdr", "socket", "socketserver", "spwd", "sqlite3", "ssl", "stat",
    "statistics", "string", "stringprep", "struct", "subprocess", "sunau", "symtable",
    "sys", "sysconfig", "syslog", "tabnanny", "tarfile", "telnetlib", "tempfile",
    "termios", "textwrap", "threading", "time", "timeit", "tkinter", "token",
    "tokenize", "tomllib", "trace", "traceback", "tracemalloc", "tty", "turtle",
    "types", "typing", "unicodedata", "unittest", "urllib", "uu", "uuid", "venv",
    "warnings", "wave", "weakref", "webbrowser", "winreg", "winsound", "wsgiref",
    "xdrlib", "xml", "xmlrpc", "zipapp", "zipfile", "zipimport", "zlib", "zoneinfo",
];

/// A full name split into the module that owns the page and the path
/// inside that module.
struct Split<'a> {
    module: &'a str,
    path: &'a str,
}

impl<'a> Split<'a> {
    fn of(full_name: &'a str) -> Self {
        if let Some((from, to)) = MODULE_RENAMES
            .iter()
            .find(|(from, _)| has_module_prefix(full_name, from))
        {
            return Self {
                module: *to,
                path: rest_after(full_name, from),
            };
        }

        if let Some(module) = SUBMODULE_PAGES
            .iter()
            .find(|module| has_module_prefix(full_name, module))
        {
            return Self {
                module: *module,
                path: rest_after(full_name, module),
            };
        }

        match full_name.split_once('.') {
            Some((module, path)) => Self { module, path },
            None => Self {
                module: full_name,
                path: "",
            },
        }
    }

    fn parts(&self) -> Vec<&'a str> {
        self.path.split('.').collect()
    }
}

/// `full_name` is `module` itself or something inside it
fn has_module_prefix(full_name: &str, module: &str) -> bool {
    full_name
        .strip_prefix(module)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with('.'))
}

fn rest_after<'a>(full_name: &'a str, module: &str) -> &'a str {
    full_name
        .get(module.len() + 1..)
        .unwrap_or_default()
}

fn is_dunder(name: &str) -> bool {
    name.len() > 4 && name.starts_with("__") && name.ends_with("__")
}

/// Page documenting `full_name`, if it belongs to the standard library or
/// the import system.
pub fn doc_url(full_name: &str) -> Option<String> {
    let split = Split::of(full_name);
    let parts = split.parts();
    let first = parts.first().copied().unwrap_or_default();
    let second = parts.get(1).copied();
    let last = full_name.rsplit('.').next().unwrap_or(full_name);

    if split.module == IMPLICIT_NAMESPACE {
        let anchor = first.strip_prefix("__").unwrap_or(first);
        return Some(format!("{DOCS_ROOT}/reference/import.html#{anchor}"));
    }

    if split.module == "typing" && first == "IO" {
        let member = second?;
        let class = match member {
            "readinto" | "read" | "readall" | "write" => "RawIOBase",
            "read1" | "readinto1" => "BufferedIOBase",
            "detach" | "encoding" | "errors" | "newlines" | "readline" => "TextIOBase",
            _ => "IOBase",
        };
        return Some(format!("{DOCS_ROOT}/library/io.html#io.{class}.{member}"));
    }

    if split.module == "builtins" {
        match (first, second) {
            ("list", Some(_)) => {
                return Some(format!("{DOCS_ROOT}/tutorial/datastructures.html#more-on-lists"));
            }
            ("tuple", Some(_)) | ("range", _) => {
                return Some(format!(
                    "{DOCS_ROOT}/library/stdtypes.html#common-sequence-operations"
                ));
            }
            // set and frozenset share one section, anchored on frozenset
            ("set", Some(member)) => {
                return Some(format!("{DOCS_ROOT}/library/stdtypes.html#frozenset.{member}"));
            }
            _ => {}
        }
    }

    if matches!(split.module, "typing" | "collections.abc")
        && ABC_CLASSES.contains(&first)
        && parts.len() == 2
    {
        return Some(format!(
            "{DOCS_ROOT}/library/collections.abc.html#collections-abstract-base-classes"
        ));
    }

    if is_dunder(last) {
        let owner = match last {
            "__instancecheck__" | "__subclasscheck__" => "class",
            _ => "object",
        };
        return Some(format!("{DOCS_ROOT}/reference/datamodel.html#{owner}.{last}"));
    }

    if split.module == "builtins" {
        return builtin_url(split.path, &parts);
    }

    let module = split.module.strip_prefix('_').unwrap_or(split.module);
    let top = module.split('.').next().unwrap_or(module);
    if !STDLIB_MODULES.contains(&top) {
        return None;
    }
    if split.path.is_empty() {
        return Some(format!("{DOCS_ROOT}/library/{module}.html#module-{module}"));
    }
    Some(format!(
        "{DOCS_ROOT}/library/{module}.html#{module}.{}",
        split.path
    ))
}

fn builtin_url(path: &str, parts: &[&str]) -> Option<String> {
    let name = *parts.first()?;
    if STD_TYPES.contains(&name) {
        return Some(format!("{DOCS_ROOT}/library/stdtypes.html#{path}"));
    }
    // Members of other builtin classes have no stable anchor
    if parts.len() != 1 || name.is_empty() {
        return None;
    }

    let page = if CONSTANTS.contains(&name) {
        "constants"
    } else if EXCEPTION_SUFFIXES
        .iter()
        .any(|suffix| name.ends_with(suffix))
    {
        "exceptions"
    } else {
        "functions"
    };
    Some(format!("{DOCS_ROOT}/library/{page}.html#{name}"))
}
