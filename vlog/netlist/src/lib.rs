//! Design hierarchy and netlist management.
//!
//! A [`Netlist`] ingests source files one at a time ([`Netlist::read_file`]),
//! registering every module found, and resolves instance-to-definition
//! references in an explicit batch [`Netlist::link`] phase afterwards — a
//! cell may reference a module defined in a file read later, so linking
//! must not happen inline during parsing.

mod diagnostics;
mod emit;
mod module;
#[cfg(test)]
mod tests;

use std::fs;

use camino::{Utf8Path, Utf8PathBuf};
use indexmap::IndexMap;
use parser::PortDirection;
use preprocessor::Preprocessor;
use tokens::LanguageStandard;
use typed_index_collections::TiVec;

pub use crate::diagnostics::{NetlistDiagnostic, NetlistError, PinLocation};
pub use crate::module::{Cell, Module, ModuleId, NameMap, Net, Pin, PinRef, Port};
pub use parser::ModuleDecls;

/// Shared ingest configuration, supplied by the option-parsing front end.
/// Every file gets its own preprocessor seeded from this configuration, so
/// stray macros or unclosed conditionals cannot leak between files.
#[derive(Debug, Clone, Default)]
pub struct NetlistConfig {
    pub defines: Vec<(String, String)>,
    pub include_dirs: Vec<Utf8PathBuf>,
    pub standard: LanguageStandard,
}

/// Per-file record kept after ingestion.
#[derive(Debug, Clone)]
pub struct FileEntry {
    pub preprocessed: String,
    pub modules: Vec<ModuleId>,
}

pub struct Netlist {
    config: NetlistConfig,
    modules: TiVec<ModuleId, Module>,
    by_name: NameMap<ModuleId>,
    files: IndexMap<Utf8PathBuf, FileEntry, ahash::RandomState>,
    pending_link: Vec<ModuleId>,
    diagnostics: Vec<NetlistDiagnostic>,
    preproc_diagnostics: preprocessor::Diagnostics,
}

impl Netlist {
    pub fn new(config: NetlistConfig) -> Netlist {
        Netlist {
            config,
            modules: TiVec::new(),
            by_name: NameMap::default(),
            files: IndexMap::default(),
            pending_link: Vec::new(),
            diagnostics: Vec::new(),
            preproc_diagnostics: Vec::new(),
        }
    }

    /// Read one source file: preprocess, parse, and register every module
    /// it defines. Resolution of instance references is deferred to
    /// [`Netlist::link`].
    pub fn read_file(&mut self, path: &Utf8Path) -> Result<(), NetlistError> {
        let src = fs::read_to_string(path)
            .map_err(|source| NetlistError::FileRead { path: path.to_owned(), source })?;
        self.read_source(&src, path)
    }

    /// [`Netlist::read_file`] for already-loaded text.
    pub fn read_source(&mut self, src: &str, origin: &Utf8Path) -> Result<(), NetlistError> {
        let mut preprocessor = self.file_preprocessor();
        let clean = preprocessor.process(src, origin)?;
        self.preproc_diagnostics.extend(preprocessor.take_diagnostics());

        let mut ids = Vec::new();
        for decls in parser::parse_modules(&clean, self.config.standard) {
            ids.push(self.register_module(build_module(decls, origin)));
        }
        self.files.insert(origin.to_owned(), FileEntry { preprocessed: clean, modules: ids });
        Ok(())
    }

    fn file_preprocessor(&self) -> Preprocessor {
        let mut preprocessor = Preprocessor::new();
        for (name, value) in &self.config.defines {
            preprocessor.define(name.as_str(), value.as_str());
        }
        for dir in &self.config.include_dirs {
            preprocessor.add_include_dir(dir.clone());
        }
        preprocessor
    }

    fn register_module(&mut self, module: Module) -> ModuleId {
        let id = match self.by_name.get(&module.name).copied() {
            Some(id) => {
                log::warn!("module {} redefined, replacing earlier definition", module.name);
                self.modules[id] = module;
                id
            }
            None => {
                let name = module.name.clone();
                let id = self.modules.push_and_get_key(module);
                self.by_name.insert(name, id);
                id
            }
        };
        if !self.pending_link.contains(&id) {
            self.pending_link.push(id);
        }
        id
    }

    /// Resolve every cell's referenced module name against the module
    /// table. Runs to a fixed point bounded by the total cell count, is
    /// idempotent, and is safe to re-run after more files are read.
    /// Afterwards top-module flags and net connectivity are recomputed.
    pub fn link(&mut self) {
        let total_cells: usize = self.modules.iter().map(|m| m.cells.len()).sum();

        let mut passes = 0;
        loop {
            let by_name = &self.by_name;
            let mut resolved_any = false;
            for module in self.modules.iter_mut() {
                for cell in module.cells.values_mut() {
                    if cell.resolved.is_none() {
                        if let Some(&id) = by_name.get(&cell.module_name) {
                            cell.resolved = Some(id);
                            resolved_any = true;
                        }
                    }
                }
            }
            passes += 1;
            if !resolved_any || passes > total_cells {
                break;
            }
        }
        self.pending_link.clear();

        let mut unresolved = Vec::new();
        for module in self.modules.iter() {
            for cell in module.cells.values() {
                if cell.resolved.is_none() {
                    unresolved.push(NetlistDiagnostic::UnresolvedModule {
                        module: module.name.clone(),
                        cell: cell.name.clone(),
                        referenced: cell.module_name.clone(),
                    });
                }
            }
        }
        for diagnostic in unresolved {
            log::warn!("{diagnostic}");
            self.diagnostics.push(diagnostic);
        }

        self.update_top_flags();
        self.annotate_connectivity();
    }

    /// A module is top-level iff no cell anywhere resolves to it. This is a
    /// global sweep over all resolved references, recomputed on every link.
    fn update_top_flags(&mut self) {
        let mut referenced = vec![false; self.modules.len()];
        for module in self.modules.iter() {
            for cell in module.cells.values() {
                if let Some(id) = cell.resolved {
                    referenced[usize::from(id)] = true;
                }
            }
        }
        for (module, referenced) in self.modules.iter_mut().zip(referenced) {
            module.is_top = !referenced;
        }
    }

    /// Rebuild each net's connection/driver/load lists from the pins
    /// attached to it. A pin drives the net when the resolved module's
    /// same-named port is an output, and loads it when that port is an
    /// input; the first driver wins.
    fn annotate_connectivity(&mut self) {
        struct Attach {
            module: ModuleId,
            net: String,
            pin_ref: PinRef,
            direction: Option<PortDirection>,
        }

        let mut attachments = Vec::new();
        for (id, module) in self.modules.iter_enumerated() {
            for cell in module.cells.values() {
                for pin in cell.pins.values() {
                    let Some(net) = &pin.net else { continue };
                    if !module.nets.contains_key(net) {
                        continue;
                    }
                    let direction = cell
                        .resolved
                        .and_then(|target| self.modules[target].ports.get(&pin.name))
                        .map(|port| port.direction);
                    attachments.push(Attach {
                        module: id,
                        net: net.clone(),
                        pin_ref: PinRef { cell: cell.name.clone(), pin: pin.name.clone() },
                        direction,
                    });
                }
            }
        }

        for module in self.modules.iter_mut() {
            for net in module.nets.values_mut() {
                net.driver = None;
                net.loads.clear();
                net.connections.clear();
            }
        }

        for attach in attachments {
            let module_name = self.modules[attach.module].name.clone();
            let net = self.modules[attach.module].nets.get_mut(&attach.net).unwrap();
            net.connections.push(attach.pin_ref.clone());
            match attach.direction {
                Some(PortDirection::Output) => {
                    if net.driver.is_none() {
                        net.driver = Some(attach.pin_ref);
                    } else {
                        let diagnostic = NetlistDiagnostic::MultipleDrivers {
                            module: module_name,
                            net: attach.net,
                            pin: PinLocation {
                                cell: attach.pin_ref.cell,
                                pin: attach.pin_ref.pin,
                            },
                        };
                        log::warn!("{diagnostic}");
                        self.diagnostics.push(diagnostic);
                    }
                }
                Some(PortDirection::Input) => net.loads.push(attach.pin_ref),
                _ => {}
            }
        }
    }

    pub fn find_module(&self, name: &str) -> Option<&Module> {
        self.by_name.get(name).map(|&id| &self.modules[id])
    }

    pub fn module_id(&self, name: &str) -> Option<ModuleId> {
        self.by_name.get(name).copied()
    }

    pub fn module(&self, id: ModuleId) -> &Module {
        &self.modules[id]
    }

    pub fn modules(&self) -> impl Iterator<Item = &Module> {
        self.modules.iter()
    }

    /// Modules never referenced as an instance by any other module.
    pub fn top_modules(&self) -> Vec<&Module> {
        self.modules.iter().filter(|module| module.is_top).collect()
    }

    pub fn files(&self) -> impl Iterator<Item = (&Utf8Path, &FileEntry)> {
        self.files.iter().map(|(path, entry)| (path.as_path(), entry))
    }

    pub fn diagnostics(&self) -> &[NetlistDiagnostic] {
        &self.diagnostics
    }

    pub fn preprocessor_diagnostics(&self) -> &[preprocessor::PreprocessorDiagnostic] {
        &self.preproc_diagnostics
    }

    /// Line-oriented structure dump for debugging.
    pub fn dump(&self) -> String {
        emit::dump(self)
    }

    /// Regenerated Verilog skeleton of every registered module,
    /// independent of original source formatting.
    pub fn verilog_text(&self) -> String {
        emit::verilog_text(self)
    }
}

fn build_module(decls: ModuleDecls, origin: &Utf8Path) -> Module {
    let mut module = Module::new(&decls.name, origin);
    for port in &decls.ports {
        module.add_port(&port.name, port.direction, port.width);
    }
    for net in &decls.nets {
        module.add_net(&net.name, &net.kind, net.width);
    }
    for parameter in &decls.parameters {
        module.parameters.insert(parameter.name.clone(), parameter.value.clone());
    }
    for cell in &decls.cells {
        let target = module.cells.entry(cell.name.clone());
        let entry = target.or_insert(Cell {
            name: cell.name.clone(),
            module_name: cell.module.clone(),
            pins: NameMap::default(),
            resolved: None,
        });
        for pin in &cell.pins {
            entry.add_pin(&pin.name, pin.net.as_deref());
        }
    }
    module
}
