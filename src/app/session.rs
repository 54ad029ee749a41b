use std::io::{BufRead, Write};

use log::info;

use crate::app::err::*;
use crate::{Poly, Registry};

const MENU: &str = "\
1) Input polynomial
2) Display polynomial
3) Query polynomial term coefficient
4) Set term of polynomial
5) Remove term from polynomial
6) Add polynomials
7) Subtract polynomials
8) Multiply polynomials
9) List stored polynomials
0) Quit";

/// Menu-driven loop over a table of named polynomials.
///
/// Generic over its streams so whole sessions can be scripted in tests.
/// Recoverable failures (parse errors, unknown names, absent terms) are
/// reported and the loop continues; only stream failure ends the session
/// early.
pub struct Session<R, W> {
    input: R,
    out: W,
    table: Registry<Poly>,
}

impl<R: BufRead, W: Write> Session<R, W> {
    pub fn new(input: R, out: W) -> Self {
        Self { input, out, table: Registry::new() }
    }

    pub fn run(&mut self) -> std::io::Result<()> {
        loop {
            writeln!(self.out, "{MENU}")?;
            write!(self.out, "Select an option: ")?;
            self.out.flush()?;

            let Some(line) = self.read_line()? else {
                break; // end of input
            };
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let Ok(cmd) = line.parse::<u32>() else {
                writeln!(self.out, "<Invalid input>")?;
                continue;
            };
            if cmd == 0 {
                break;
            }

            info!("cmd: {cmd}");
            match self.dispatch(cmd) {
                Ok(msg) => writeln!(self.out, "{msg}")?,
                Err(e) => writeln!(self.out, "Error: {e}")?,
            }
        }
        Ok(())
    }

    fn dispatch(&mut self, cmd: u32) -> Result<String, Box<dyn std::error::Error>> {
        match cmd {
            1 => self.cmd_input(),
            2 => self.cmd_display(),
            3 => self.cmd_query(),
            4 => self.cmd_set_term(),
            5 => self.cmd_remove_term(),
            6 => self.cmd_binop("adder", |a, b| a + b),
            7 => self.cmd_binop("subtractor", |a, b| a - b),
            8 => self.cmd_binop("factor", |a, b| a * b),
            9 => self.cmd_list(),
            _ => err!("<Invalid option!>"),
        }
    }

    fn cmd_input(&mut self) -> Result<String, Box<dyn std::error::Error>> {
        let name = self.prompt("Input polynomial name: ")?;
        ensure!(!name.is_empty(), "name must not be empty");

        let expr = self.prompt("Input polynomial (in ax^b + cx^d form): ")?;
        let p: Poly = expr.parse()?;

        info!("store '{name}' = {p}");
        self.table.insert(name, p);
        Ok("Stored.".to_owned())
    }

    fn cmd_display(&mut self) -> Result<String, Box<dyn std::error::Error>> {
        let name = self.prompt("Input polynomial name: ")?;
        let Some(p) = self.table.get(&name) else {
            return err!("cannot find polynomial '{name}'");
        };
        Ok(format!("Result: {p}"))
    }

    fn cmd_query(&mut self) -> Result<String, Box<dyn std::error::Error>> {
        let name = self.prompt("Input polynomial name: ")?;
        let exp: usize = self.prompt_parse("Input exponent of the query term: ")?;

        let Some(p) = self.table.get(&name) else {
            return err!("cannot find polynomial '{name}'");
        };
        Ok(format!("Result: {}", p.coeff(exp)))
    }

    fn cmd_set_term(&mut self) -> Result<String, Box<dyn std::error::Error>> {
        let name = self.prompt("Input polynomial name: ")?;
        let coeff: f64 = self.prompt_parse("Input coefficient of the term: ")?;
        let exp: usize = self.prompt_parse("Input exponent of the term: ")?;

        let Some(p) = self.table.get_mut(&name) else {
            return err!("cannot find polynomial '{name}'");
        };
        p.set_term(exp, coeff);

        info!("updated '{name}' = {p}");
        Ok(format!("Result: {p}"))
    }

    fn cmd_remove_term(&mut self) -> Result<String, Box<dyn std::error::Error>> {
        let name = self.prompt("Input polynomial name: ")?;
        let exp: usize = self.prompt_parse("Input exponent of the term to remove: ")?;

        let Some(p) = self.table.get_mut(&name) else {
            return err!("cannot find polynomial '{name}'");
        };
        match p.remove_term(exp) {
            Some(_) => Ok(format!("Result: {p}")),
            None => err!("term not found"),
        }
    }

    fn cmd_binop(
        &mut self,
        role: &str,
        f: impl Fn(&Poly, &Poly) -> Poly,
    ) -> Result<String, Box<dyn std::error::Error>> {
        let name1 = self.prompt(&format!("Input first {role}'s name: "))?;
        let name2 = self.prompt(&format!("Input second {role}'s name: "))?;

        let (Some(a), Some(b)) = (self.table.get(&name1), self.table.get(&name2)) else {
            return err!("cannot find polynomial");
        };
        let res = f(a, b);

        info!("'{name1}', '{name2}' -> {res}");
        Ok(format!("Result: {res}"))
    }

    fn cmd_list(&mut self) -> Result<String, Box<dyn std::error::Error>> {
        ensure!(!self.table.is_empty(), "no polynomials stored");

        use itertools::Itertools;
        let lines = self
            .table
            .names()
            .map(|n| {
                let p = self.table.get(n).map(Poly::to_string).unwrap_or_default();
                format!("{n}: {p}")
            })
            .join("\n");
        Ok(lines)
    }

    fn prompt(&mut self, msg: &str) -> Result<String, Box<dyn std::error::Error>> {
        write!(self.out, "{msg}")?;
        self.out.flush()?;

        match self.read_line()? {
            Some(line) => Ok(line.trim().to_owned()),
            None => err!("unexpected end of input"),
        }
    }

    fn prompt_parse<T: std::str::FromStr>(
        &mut self,
        msg: &str,
    ) -> Result<T, Box<dyn std::error::Error>> {
        let s = self.prompt(msg)?;
        match s.parse::<T>() {
            Ok(v) => Ok(v),
            Err(_) => err!("<Invalid input> '{s}'"),
        }
    }

    fn read_line(&mut self) -> std::io::Result<Option<String>> {
        let mut buf = String::new();
        let n = self.input.read_line(&mut buf)?;
        Ok((n > 0).then_some(buf))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_script(script: &str) -> String {
        let mut out = Vec::new();
        let mut session = Session::new(script.as_bytes(), &mut out);
        session.run().unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn store_and_display() {
        let out = run_script("1\nf\n3x^2 + 2x - 5\n2\nf\n0\n");
        assert!(out.contains("Stored."));
        assert!(out.contains("Result: -5 +2x +3x^2 "));
    }

    #[test]
    fn display_unknown_name() {
        let out = run_script("2\nnope\n0\n");
        assert!(out.contains("Error: cannot find polynomial 'nope'"));
    }

    #[test]
    fn invalid_expression_not_stored() {
        let out = run_script("1\nf\n3x^\n2\nf\n0\n");
        assert!(out.contains("Error: missing exponent after '^'"));
        assert!(out.contains("Error: cannot find polynomial 'f'"));
    }

    #[test]
    fn invalid_menu_choice() {
        let out = run_script("abc\n42\n0\n");
        assert!(out.contains("<Invalid input>"));
        assert!(out.contains("Error: <Invalid option!>"));
    }

    #[test]
    fn eof_exits() {
        let out = run_script("");
        assert!(out.contains("Select an option: "));
    }
}
