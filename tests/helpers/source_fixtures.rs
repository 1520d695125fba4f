//! Common IML fixtures for tests.

pub const SIMPLE_BRANCH: &str =
    "let simple_branch x = if x = 1 || x = 2 then x + 1 else x - 1\n[@@decomp top ()]\n";

pub const FULL_DECOMP: &str = "\
let p x = x > 0
let a x = x
let b x = x
let f x =
  if p x then a x else b x
[@@decomp top ~assuming:[%id p] ~basis:[[%id a] ; [%id b]] ~prune:true ~lift_bool: Default ()]
";

pub const VERIFY_IMPLICATION: &str = "verify (fun x -> x > 0 ==> x + 1 > x)\n";

/// Three `verify` statements between ordinary definitions
pub const INTERLEAVED_VERIFY: &str = "\
let f x = x + 1
verify (fun x -> f x > x)
let g x = x * 2
verify (fun x -> g x >= x) [@@by auto]
let rec sum n = if n <= 0 then 0 else n + sum (n - 1)
verify (fun n -> sum n >= 0)
let h x = f (g x)
";

pub const MIXED_DOCUMENT: &str = r#"[@@@import Helpers, "helpers.iml"]
[@@@import "lib/util.iml"]

let double x = x * 2
[@@opaque]

let classify x =
  match x with
  | 0 -> "zero"
  | n when n > 0 -> "positive"
  | _ -> "negative"
[@@decomp top ~basis:[[%id double]] ~lift_bool:Nested_equalities ()]

verify (fun x -> double x = x + x)
instance (fun x -> classify x = "positive")
eval (classify 3)

lemma double_pos x = x > 0 ==> double x > x
axiom trust_me x = x = x
"#;
