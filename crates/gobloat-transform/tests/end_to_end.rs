//! Whole-pipeline tests: parse, rewrite, print, and check the printed
//! output still parses.

use gobloat_parser::parse_file;
use gobloat_printer::print_file;
use gobloat_syntax::SourceFile;
use gobloat_transform::{collect, transform, update, TransformStats};

fn rewrite(src: &str) -> String {
    let mut file = parse_file("input.go", src).unwrap();
    transform(&mut file);
    reprint(&file)
}

/// Print and assert the output is still valid syntax.
fn reprint(file: &SourceFile) -> String {
    let out = print_file(file);
    parse_file("output.go", &out)
        .unwrap_or_else(|err| panic!("rewritten output does not parse: {err}\n{out}"));
    out
}

#[test]
fn wraps_eligible_block_statements() {
    let src = "\
package p

func f() {
	x := 1
	x = x + 1
	record(x)
}
";
    let want = "\
package p

func f() {
	x := 1
	func() {
		x = x + 1
	}()
	func() {
		record(x)
	}()
}
";
    assert_eq!(rewrite(src), want);
}

#[test]
fn early_return_guard_stays_unchanged() {
    let src = "\
package p

func f(err error) error {
	if err != nil {
		return err
	}
	return nil
}
";
    assert_eq!(rewrite(src), src);
}

#[test]
fn infinite_loop_kept_but_its_body_rewritten() {
    let src = "\
package p

func f() {
	for {
		doWork()
	}
}
";
    let want = "\
package p

func f() {
	for {
		func() {
			doWork()
		}()
	}
}
";
    assert_eq!(rewrite(src), want);
}

#[test]
fn loop_header_slots_are_rewritten() {
    let src = "\
package p

func f(n int) {
	for i = 0; i < n; i++ {
		hit(i)
	}
}
";
    let want = "\
package p

func f(n int) {
	func() {
		for func() { i = 0 }(); i < n; func() { i++ }() {
			func() {
				hit(i)
			}()
		}
	}()
}
";
    assert_eq!(rewrite(src), want);
}

#[test]
fn else_branch_is_a_rewritten_slot() {
    let src = "\
package p

func f(a bool) {
	if a {
		return
	} else {
		b()
	}
}
";
    let out = rewrite(src);
    assert!(out.contains("\t} else func() { func() { b() }() }()\n"), "{out}");
    // The then branch holds a return and stays put.
    assert!(out.contains("\tif a {\n\t\treturn\n\t}"), "{out}");
}

#[test]
fn switch_header_and_arms_are_rewritten() {
    let src = "\
package p

func f(x int) {
	switch x = step(x); x {
	case 0:
		reset()
	default:
		advance(x)
	}
}
";
    let want = "\
package p

func f(x int) {
	func() {
		switch func() { x = step(x) }(); x {
		case 0:
			func() {
				reset()
			}()
		default:
			func() {
				advance(x)
			}()
		}
	}()
}
";
    assert_eq!(rewrite(src), want);
}

#[test]
fn select_arms_are_rewritten_but_comm_headers_kept() {
    let src = "\
package p

func f(ch chan int) {
	select {
	case v := <-ch:
		use(v)
	default:
		return
	}
}
";
    let want = "\
package p

func f(ch chan int) {
	select {
	case v := <-ch:
		func() {
			use(v)
		}()
	default:
		return
	}
}
";
    assert_eq!(rewrite(src), want);
}

#[test]
fn labeled_body_is_rewritten_under_its_label() {
    let src = "\
package p

func f() {
	done:
	record()
}
";
    let want = "\
package p

func f() {
	done:
	func() {
		record()
	}()
}
";
    assert_eq!(rewrite(src), want);
}

#[test]
fn declaration_statements_stay_while_neighbors_are_wrapped() {
    let src = "\
package p

func f() {
	var x = 1
	use(x)
}
";
    let want = "\
package p

func f() {
	var x = 1
	func() {
		use(x)
	}()
}
";
    assert_eq!(rewrite(src), want);
}

#[test]
fn rerunning_adds_layers_instead_of_converging() {
    let src = "\
package p

func f() {
	x = x + 1
}
";
    let mut file = parse_file("input.go", src).unwrap();
    transform(&mut file);
    let once = reprint(&file);
    transform(&mut file);
    let twice = reprint(&file);

    assert_ne!(once, twice);
    assert_eq!(once.matches("func() {").count(), 1);
    // The second run wraps both the outer call statement and the
    // assignment inside the first wrapper's body.
    assert_eq!(twice.matches("func() {").count(), 3);
}

#[test]
fn update_order_does_not_matter() {
    let src = "\
package p

func f(x int, ch chan int) {
	if x > 0 {
		x = x - 1
	}
	for i = 0; i < x; i++ {
		select {
		case ch <- i:
			sent(i)
		default:
		}
	}
}
";
    let mut forward = parse_file("a.go", src).unwrap();
    let owners = collect(&forward);
    let forward_stats = update(&mut forward, &owners);

    let mut backward = parse_file("b.go", src).unwrap();
    let mut owners = collect(&backward);
    owners.reverse();
    let backward_stats = update(&mut backward, &owners);

    assert_eq!(forward_stats, backward_stats);
    assert_eq!(reprint(&forward), reprint(&backward));
}

#[test]
fn stats_count_owners_and_wraps() {
    let src = "\
package p

func f() {
	x := 1
	x = x + 1
	record(x)
}
";
    let mut file = parse_file("input.go", src).unwrap();
    let stats = transform(&mut file);
    assert_eq!(
        stats,
        TransformStats {
            owners: 1,
            wrapped: 2
        }
    );
}

#[test]
fn printed_output_is_a_fixed_point_of_print() {
    let src = "\
package p

import \"fmt\"

func f(xs []int, m map[string]int) {
	go func() {
		for _, v := range xs {
			fmt.Println(v)
		}
	}()
	switch v := m[\"k\"]; v {
	case 1, 2:
		touch(v)
	}
}
";
    let out = rewrite(src);
    // No second transform; printing a parsed print must be stable.
    let again = print_file(&parse_file("again.go", &out).unwrap());
    assert_eq!(out, again);
}
