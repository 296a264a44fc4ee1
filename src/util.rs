/*!
Iterator plumbing.
*/

/**
Turns an iterator of `Result`s into an iterator of values that stops at the first error, parking that error in a caller-owned trap.

This lets a fallible scalar stream be fed to `sum`, `count`, or a `for` loop, with the error inspected once the loop is over:

```ignore
let mut trap = Ok(());
let len: usize = scalars.trap_err(&mut trap).map(units_for).sum();
trap?;
```
*/
pub trait TrapErrExt: Sized + Iterator {
    type Trap;
    fn trap_err(self, trap: &mut Result<(), Self::Trap>) -> TrapErrIter<Self, Self::Trap>;
}

impl<It, T, E> TrapErrExt for It where It: Iterator<Item=Result<T, E>> {
    type Trap = E;

    fn trap_err(self, trap: &mut Result<(), E>) -> TrapErrIter<Self, E> {
        TrapErrIter {
            iter: Some(self),
            trap: trap,
        }
    }
}

pub struct TrapErrIter<'a, It, Trap: 'a> {
    iter: Option<It>,
    trap: &'a mut Result<(), Trap>,
}

impl<'a, It, T, E> Iterator for TrapErrIter<'a, It, E>
where
    It: Iterator<Item=Result<T, E>>,
{
    type Item = T;

    fn next(&mut self) -> Option<T> {
        let iter = self.iter.as_mut()?;
        match iter.next() {
            Some(Ok(v)) => Some(v),
            Some(Err(err)) => {
                self.iter = None;
                *self.trap = Err(err);
                None
            },
            None => {
                self.iter = None;
                None
            },
        }
    }
}
