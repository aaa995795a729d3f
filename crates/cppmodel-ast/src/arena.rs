/// Declare an `Arena<'tcx>` with one `typed_arena` field per node type, and
/// the `ArenaAllocatable` impls that let `arena.alloc(node)` pick the field.
///
/// ```ignore
/// declare_arena!([
///     names: NameAst<'tcx>,
///     declarators: DeclaratorAst<'tcx>,
/// ]);
/// ```
#[macro_export]
macro_rules! declare_arena {
    ([$($arena_name:ident : $arena_ty:ty),* $(,)?]) => {
        #[derive(Default)]
        pub struct Arena<'tcx> {
            $( pub $arena_name : typed_arena::Arena<$arena_ty>, )*
            _marker: std::marker::PhantomData<&'tcx ()>,
        }

        impl<'tcx> std::fmt::Debug for Arena<'tcx> {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.debug_struct("Arena")
                    $( .field(stringify!($arena_name), &self.$arena_name.len()) )*
                    .finish()
            }
        }

        pub trait ArenaAllocatable<'tcx>: Sized {
            fn allocate_on(self, arena: &'tcx Arena<'tcx>) -> &'tcx Self;
        }

        $(
            impl<'tcx> ArenaAllocatable<'tcx> for $arena_ty {
                #[inline]
                fn allocate_on(self, arena: &'tcx Arena<'tcx>) -> &'tcx Self {
                    arena.$arena_name.alloc(self)
                }
            }
        )*

        impl<'tcx> Arena<'tcx> {
            #[inline]
            pub fn alloc<T: ArenaAllocatable<'tcx>>(&'tcx self, value: T) -> &'tcx T {
                value.allocate_on(self)
            }

            /// Total number of nodes allocated so far.
            pub fn node_count(&self) -> usize {
                0 $( + self.$arena_name.len() )*
            }
        }
    };
}

#[cfg(test)]
mod tests {
    #[derive(Debug, PartialEq)]
    pub struct Leaf(i32);

    #[derive(Debug, PartialEq)]
    pub struct Branch<'tcx> {
        left: &'tcx Leaf,
        right: Option<&'tcx Branch<'tcx>>,
    }

    declare_arena!([
        leaves: Leaf,
        branches: Branch<'tcx>,
    ]);

    #[test]
    fn alloc_routes_by_type() {
        let arena = Arena::default();
        let a = arena.alloc(Leaf(1));
        let b = arena.alloc(Leaf(2));
        let inner = arena.alloc(Branch { left: a, right: None });
        let outer = arena.alloc(Branch { left: b, right: Some(inner) });

        assert_eq!(outer.right.map(|r| r.left), Some(&Leaf(1)));
        assert_eq!(arena.leaves.len(), 2);
        assert_eq!(arena.branches.len(), 2);
        assert_eq!(arena.node_count(), 4);
    }

    #[test]
    fn deep_chains_drop_without_recursion() {
        let arena = Arena::default();
        let leaf = arena.alloc(Leaf(0));
        let mut top = arena.alloc(Branch { left: leaf, right: None });
        for _ in 0..200_000 {
            top = arena.alloc(Branch { left: leaf, right: Some(top) });
        }
        assert!(top.right.is_some());
        assert_eq!(arena.branches.len(), 200_001);
    }
}
