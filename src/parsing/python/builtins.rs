//! Names the interpreter provides without an import.

/// Module that holds every builtin name
pub const BUILTINS_MODULE: &str = "builtins";

/// Builtin classes; usable as receivers for attribute lookup
const BUILTIN_TYPES: &[&str] = &[
    "bool",
    "bytearray",
    "bytes",
    "classmethod",
    "complex",
    "dict",
    "enumerate",
    "filter",
    "float",
    "frozenset",
    "int",
    "list",
    "map",
    "memoryview",
    "object",
    "property",
    "range",
    "reversed",
    "set",
    "slice",
    "staticmethod",
    "str",
    "super",
    "tuple",
    "type",
    "zip",
];

const BUILTIN_FUNCTIONS: &[&str] = &[
    "__build_class__",
    "__import__",
    "abs",
    "aiter",
    "all",
    "anext",
    "any",
    "ascii",
    "bin",
    "breakpoint",
    "callable",
    "chr",
    "compile",
    "copyright",
    "credits",
    "delattr",
    "dir",
    "divmod",
    "eval",
    "exec",
    "exit",
    "format",
    "getattr",
    "globals",
    "hasattr",
    "hash",
    "help",
    "hex",
    "id",
    "input",
    "isinstance",
    "issubclass",
    "iter",
    "len",
    "license",
    "locals",
    "max",
    "min",
    "next",
    "oct",
    "open",
    "ord",
    "pow",
    "print",
    "quit",
    "repr",
    "round",
    "setattr",
    "sorted",
    "sum",
    "vars",
];

const BUILTIN_CONSTANTS: &[&str] = &["Ellipsis", "NotImplemented", "__debug__"];

const BUILTIN_EXCEPTIONS: &[&str] = &[
    "ArithmeticError",
    "AssertionError",
    "AttributeError",
    "BaseException",
    "BaseExceptionGroup",
    "BlockingIOError",
    "BrokenPipeError",
    "BufferError",
    "BytesWarning",
    "ChildProcessError",
    "ConnectionAbortedError",
    "ConnectionError",
    "ConnectionRefusedError",
    "ConnectionResetError",
    "DeprecationWarning",
    "EOFError",
    "EncodingWarning",
    "EnvironmentError",
    "Exception",
    "ExceptionGroup",
    "FileExistsError",
    "FileNotFoundError",
    "FloatingPointError",
    "FutureWarning",
    "GeneratorExit",
    "IOError",
    "ImportError",
    "ImportWarning",
    "IndentationError",
    "IndexError",
    "InterruptedError",
    "IsADirectoryError",
    "KeyError",
    "KeyboardInterrupt",
    "LookupError",
    "MemoryError",
    "ModuleNotFoundError",
    "NameError",
    "NotADirectoryError",
    "NotImplementedError",
    "OSError",
    "OverflowError",
    "PendingDeprecationWarning",
    "PermissionError",
    "ProcessLookupError",
    "RecursionError",
    "ReferenceError",
    "ResourceWarning",
    "RuntimeError",
    "RuntimeWarning",
    "StopAsyncIteration",
    "StopIteration",
    "SyntaxError",
    "SyntaxWarning",
    "SystemError",
    "SystemExit",
    "TabError",
    "TimeoutError",
    "TypeError",
    "UnboundLocalError",
    "UnicodeDecodeError",
    "UnicodeEncodeError",
    "UnicodeError",
    "UnicodeTranslateError",
    "UnicodeWarning",
    "UserWarning",
    "ValueError",
    "Warning",
    "ZeroDivisionError",
];

/// Attributes every module object gets from the import system
const IMPLICIT_MODULE_ATTRIBUTES: &[&str] = &[
    "__annotations__",
    "__builtins__",
    "__cached__",
    "__dict__",
    "__doc__",
    "__file__",
    "__loader__",
    "__name__",
    "__package__",
    "__path__",
    "__spec__",
];

/// Modules compiled into the interpreter; they have no file on any search path
const BUILTIN_MODULES: &[&str] = &[
    "_abc",
    "_ast",
    "_codecs",
    "_collections",
    "_functools",
    "_imp",
    "_io",
    "_locale",
    "_operator",
    "_signal",
    "_sre",
    "_stat",
    "_string",
    "_symtable",
    "_thread",
    "_tokenize",
    "_tracemalloc",
    "_typing",
    "_warnings",
    "_weakref",
    "atexit",
    "builtins",
    "errno",
    "faulthandler",
    "gc",
    "itertools",
    "marshal",
    "posix",
    "pwd",
    "sys",
    "time",
    "xxsubtype",
];

const OBJECT_MEMBERS: &[&str] = &[
    "__class__",
    "__delattr__",
    "__dir__",
    "__doc__",
    "__eq__",
    "__format__",
    "__ge__",
    "__getattribute__",
    "__getstate__",
    "__gt__",
    "__hash__",
    "__init__",
    "__init_subclass__",
    "__le__",
    "__lt__",
    "__module__",
    "__ne__",
    "__new__",
    "__reduce__",
    "__reduce_ex__",
    "__repr__",
    "__setattr__",
    "__sizeof__",
    "__str__",
    "__subclasshook__",
];

const STR_MEMBERS: &[&str] = &[
    "capitalize",
    "casefold",
    "center",
    "count",
    "encode",
    "endswith",
    "expandtabs",
    "find",
    "format",
    "format_map",
    "index",
    "isalnum",
    "isalpha",
    "isascii",
    "isdecimal",
    "isdigit",
    "isidentifier",
    "islower",
    "isnumeric",
    "isprintable",
    "isspace",
    "istitle",
    "isupper",
    "join",
    "ljust",
    "lower",
    "lstrip",
    "maketrans",
    "partition",
    "removeprefix",
    "removesuffix",
    "replace",
    "rfind",
    "rindex",
    "rjust",
    "rpartition",
    "rsplit",
    "rstrip",
    "split",
    "splitlines",
    "startswith",
    "strip",
    "swapcase",
    "title",
    "translate",
    "upper",
    "zfill",
    "__add__",
    "__contains__",
    "__getitem__",
    "__iter__",
    "__len__",
    "__mod__",
    "__mul__",
];

const BYTES_MEMBERS: &[&str] = &[
    "capitalize",
    "center",
    "count",
    "decode",
    "endswith",
    "expandtabs",
    "find",
    "fromhex",
    "hex",
    "index",
    "isalnum",
    "isalpha",
    "isascii",
    "isdigit",
    "islower",
    "isspace",
    "istitle",
    "isupper",
    "join",
    "ljust",
    "lower",
    "lstrip",
    "maketrans",
    "partition",
    "removeprefix",
    "removesuffix",
    "replace",
    "rfind",
    "rindex",
    "rjust",
    "rpartition",
    "rsplit",
    "rstrip",
    "split",
    "splitlines",
    "startswith",
    "strip",
    "swapcase",
    "title",
    "translate",
    "upper",
    "zfill",
    "__add__",
    "__contains__",
    "__getitem__",
    "__iter__",
    "__len__",
];

const LIST_MEMBERS: &[&str] = &[
    "append",
    "clear",
    "copy",
    "count",
    "extend",
    "index",
    "insert",
    "pop",
    "remove",
    "reverse",
    "sort",
    "__add__",
    "__contains__",
    "__delitem__",
    "__getitem__",
    "__iadd__",
    "__iter__",
    "__len__",
    "__reversed__",
    "__setitem__",
];

const TUPLE_MEMBERS: &[&str] = &[
    "count",
    "index",
    "__add__",
    "__contains__",
    "__getitem__",
    "__iter__",
    "__len__",
];

const RANGE_MEMBERS: &[&str] = &[
    "count",
    "index",
    "start",
    "step",
    "stop",
    "__contains__",
    "__getitem__",
    "__iter__",
    "__len__",
    "__reversed__",
];

const DICT_MEMBERS: &[&str] = &[
    "clear",
    "copy",
    "fromkeys",
    "get",
    "items",
    "keys",
    "pop",
    "popitem",
    "setdefault",
    "update",
    "values",
    "__contains__",
    "__delitem__",
    "__getitem__",
    "__iter__",
    "__len__",
    "__or__",
    "__setitem__",
];

const SET_MEMBERS: &[&str] = &[
    "add",
    "clear",
    "copy",
    "difference",
    "difference_update",
    "discard",
    "intersection",
    "intersection_update",
    "isdisjoint",
    "issubset",
    "issuperset",
    "pop",
    "remove",
    "symmetric_difference",
    "symmetric_difference_update",
    "union",
    "update",
    "__and__",
    "__contains__",
    "__iter__",
    "__len__",
    "__or__",
    "__sub__",
    "__xor__",
];

const FROZENSET_MEMBERS: &[&str] = &[
    "copy",
    "difference",
    "intersection",
    "isdisjoint",
    "issubset",
    "issuperset",
    "symmetric_difference",
    "union",
    "__and__",
    "__contains__",
    "__iter__",
    "__len__",
    "__or__",
    "__sub__",
    "__xor__",
];

const INT_MEMBERS: &[&str] = &[
    "as_integer_ratio",
    "bit_count",
    "bit_length",
    "conjugate",
    "denominator",
    "from_bytes",
    "imag",
    "is_integer",
    "numerator",
    "real",
    "to_bytes",
    "__abs__",
    "__add__",
    "__and__",
    "__bool__",
    "__floordiv__",
    "__index__",
    "__int__",
    "__invert__",
    "__lshift__",
    "__mod__",
    "__mul__",
    "__neg__",
    "__or__",
    "__pow__",
    "__rshift__",
    "__sub__",
    "__truediv__",
    "__xor__",
];

const FLOAT_MEMBERS: &[&str] = &[
    "as_integer_ratio",
    "conjugate",
    "fromhex",
    "hex",
    "imag",
    "is_integer",
    "real",
    "__abs__",
    "__add__",
    "__bool__",
    "__float__",
    "__floordiv__",
    "__int__",
    "__mod__",
    "__mul__",
    "__neg__",
    "__pow__",
    "__round__",
    "__sub__",
    "__truediv__",
    "__trunc__",
];

const COMPLEX_MEMBERS: &[&str] = &[
    "conjugate",
    "imag",
    "real",
    "__abs__",
    "__add__",
    "__mul__",
    "__neg__",
    "__pow__",
    "__sub__",
    "__truediv__",
];

const TYPE_MEMBERS: &[&str] = &[
    "mro",
    "__base__",
    "__bases__",
    "__call__",
    "__instancecheck__",
    "__mro__",
    "__name__",
    "__prepare__",
    "__qualname__",
    "__subclasscheck__",
    "__subclasses__",
];

pub fn is_builtin_type(name: &str) -> bool {
    BUILTIN_TYPES.contains(&name) || BUILTIN_EXCEPTIONS.contains(&name)
}

/// Any name resolvable in the `builtins` module
pub fn is_builtin_name(name: &str) -> bool {
    is_builtin_type(name)
        || BUILTIN_FUNCTIONS.contains(&name)
        || BUILTIN_CONSTANTS.contains(&name)
}

pub fn is_implicit_module_attribute(name: &str) -> bool {
    IMPLICIT_MODULE_ATTRIBUTES.contains(&name)
}

pub fn is_builtin_module(name: &str) -> bool {
    BUILTIN_MODULES.contains(&name)
}

/// Canonical spelling of a builtin type (`&'static` so values can hold it)
pub fn builtin_type(name: &str) -> Option<&'static str> {
    BUILTIN_TYPES
        .iter()
        .chain(BUILTIN_EXCEPTIONS.iter())
        .find(|t| **t == name)
        .copied()
}

/// The builtin class that defines `member` for instances of `type_name`,
/// walking the builtin bases (`bool` → `int` → `object`).
pub fn defining_builtin_type(type_name: &'static str, member: &str) -> Option<&'static str> {
    let mut current = Some(type_name);
    while let Some(name) = current {
        if own_members(name).is_some_and(|members| members.contains(&member)) {
            return Some(name);
        }
        current = builtin_base(name);
    }
    None
}

fn own_members(type_name: &str) -> Option<&'static [&'static str]> {
    let members: &'static [&'static str] = match type_name {
        "object" => OBJECT_MEMBERS,
        "str" => STR_MEMBERS,
        "bytes" | "bytearray" => BYTES_MEMBERS,
        "list" => LIST_MEMBERS,
        "tuple" => TUPLE_MEMBERS,
        "range" => RANGE_MEMBERS,
        "dict" => DICT_MEMBERS,
        "set" => SET_MEMBERS,
        "frozenset" => FROZENSET_MEMBERS,
        "int" => INT_MEMBERS,
        "float" => FLOAT_MEMBERS,
        "complex" => COMPLEX_MEMBERS,
        "type" => TYPE_MEMBERS,
        _ => return None,
    };
    Some(members)
}

fn builtin_base(type_name: &str) -> Option<&'static str> {
    match type_name {
        "object" => None,
        "bool" => Some("int"),
        _ => Some("object"),
    }
}
