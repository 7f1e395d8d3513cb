//! Type formatting in Candid syntax.

use super::Pool;
use crate::{Idx, Tag};

impl Pool {
    /// Format a type the way it would be written in a `.did` file.
    ///
    /// Recursive placeholders print as their name and are not expanded.
    pub fn format_type(&self, idx: Idx) -> String {
        let mut buf = String::new();
        self.format_type_into(idx, &mut buf);
        buf
    }

    /// Format a type into an existing string buffer.
    pub fn format_type_into(&self, idx: Idx, buf: &mut String) {
        if idx.is_none() {
            buf.push_str("<none>");
            return;
        }
        if let Some(name) = idx.name() {
            buf.push_str(name);
            return;
        }
        match self.tag(idx) {
            Tag::Opt => {
                buf.push_str("opt ");
                self.format_child(idx, buf);
            }
            Tag::Vec if self.inner(idx) == Some(Idx::NAT8) => buf.push_str("blob"),
            Tag::Vec => {
                buf.push_str("vec ");
                self.format_child(idx, buf);
            }
            Tag::Record => {
                let tuple = self.is_tuple(idx);
                self.format_fields("record", idx, buf, |buf, label, ty| {
                    if !tuple {
                        buf.push_str(&label.to_string());
                        buf.push_str(" : ");
                    }
                    self.format_type_into(ty, buf);
                });
            }
            Tag::Variant => {
                self.format_fields("variant", idx, buf, |buf, label, ty| {
                    buf.push_str(&label.to_string());
                    if ty != Idx::NULL {
                        buf.push_str(" : ");
                        self.format_type_into(ty, buf);
                    }
                });
            }
            Tag::Service => {
                self.format_fields("service", idx, buf, |buf, label, ty| {
                    buf.push_str(&label.to_string());
                    buf.push_str(" : ");
                    self.format_type_into(ty, buf);
                });
            }
            Tag::Func => {
                buf.push_str("func ");
                self.format_list(&self.func_args(idx), buf);
                buf.push_str(" -> ");
                self.format_list(&self.func_rets(idx), buf);
                let modes = self.func_modes(idx);
                for (flag, word) in [
                    (super::FuncModes::QUERY, " query"),
                    (super::FuncModes::COMPOSITE_QUERY, " composite_query"),
                    (super::FuncModes::ONEWAY, " oneway"),
                ] {
                    if modes.contains(flag) {
                        buf.push_str(word);
                    }
                }
            }
            Tag::Rec => buf.push_str(self.rec_name(idx).unwrap_or("<rec>")),
            // Primitives were handled by their fixed names above.
            tag => buf.push_str(&format!("{tag:?}").to_ascii_lowercase()),
        }
    }

    fn format_child(&self, idx: Idx, buf: &mut String) {
        if let Some(inner) = self.inner(idx) {
            self.format_type_into(inner, buf);
        }
    }

    fn format_list(&self, tys: &[Idx], buf: &mut String) {
        buf.push('(');
        for (i, &ty) in tys.iter().enumerate() {
            if i > 0 {
                buf.push_str(", ");
            }
            self.format_type_into(ty, buf);
        }
        buf.push(')');
    }

    fn format_fields(
        &self,
        keyword: &str,
        idx: Idx,
        buf: &mut String,
        mut field: impl FnMut(&mut String, &crate::Label, Idx),
    ) {
        buf.push_str(keyword);
        if self.fields(idx).len() == 0 {
            buf.push_str(" {}");
            return;
        }
        buf.push_str(" { ");
        for (i, (label, ty)) in self.fields(idx).enumerate() {
            if i > 0 {
                buf.push_str("; ");
            }
            field(buf, label, ty);
        }
        buf.push_str(" }");
    }
}
