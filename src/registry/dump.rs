use std::io::Write;

use super::{InterfaceKind, Registry};

impl Registry {
    /// Write a human-readable listing of the registry.
    ///
    /// The layout is for inspection only and may change between versions.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to `out` fails.
    pub fn dump(&self, out: &mut dyn Write) -> std::io::Result<()> {
        writeln!(out, "// Types")?;
        for ty in self.types() {
            let category = ty.category.as_deref().unwrap_or("-");
            match &ty.alias {
                Some(alias) => writeln!(out, "    Type {} ({category}) -> {alias}", ty.name)?,
                None => writeln!(out, "    Type {} ({category})", ty.name)?,
            }
        }

        writeln!(out, "// Commands")?;
        for cmd in self.commands() {
            match &cmd.alias {
                Some(alias) => writeln!(out, "    Command {} -> {alias}", cmd.name)?,
                None => {
                    let params: Vec<&str> = cmd.params.iter().map(|p| p.decl.as_str()).collect();
                    writeln!(
                        out,
                        "    Command {} {}({})",
                        cmd.return_type,
                        cmd.name,
                        params.join(", ")
                    )?;
                }
            }
        }

        for (label, kind) in [
            ("// Features", InterfaceKind::Feature),
            ("// Extensions", InterfaceKind::Extension),
        ] {
            writeln!(out, "{label}")?;
            for iface in self.interfaces().iter().filter(|i| i.kind == kind) {
                let state = match (iface.selected, iface.emitted) {
                    (true, true) => "emit",
                    (true, false) => "include",
                    _ => "skip",
                };
                writeln!(
                    out,
                    "    {} [{state}] commands={}",
                    iface.name,
                    iface.commands.len()
                )?;
            }
        }

        let dups = self.duplicates();
        writeln!(
            out,
            "// Duplicates types={} commands={} interfaces={}",
            dups.types, dups.commands, dups.interfaces
        )?;
        Ok(())
    }
}
